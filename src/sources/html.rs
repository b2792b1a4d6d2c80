//! HTML horse pages read through the site's selector tables.

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

use super::{HorseSource, PageFetcher};
use crate::error::ScrapeError;
use crate::normalize::{horse, Context};
use crate::pedigree::{parse_key, PedigreeAssembler};
use crate::pipeline::{build_fragment, Loader, HORSE};
use crate::sites::{
    FieldSelector, HtmlSelectors, OffspringList, OffspringRows, PedigreeCells, SiteConfig,
};
use crate::types::HorseRecord;

pub struct HtmlSource {
    site: &'static SiteConfig,
    selectors: &'static HtmlSelectors,
    fetcher: Arc<dyn PageFetcher>,
}

impl HtmlSource {
    /// Fails for sites without fetchable horse pages
    pub fn new(
        site: &'static SiteConfig,
        fetcher: Arc<dyn PageFetcher>,
    ) -> crate::error::Result<Self> {
        let selectors = site
            .html
            .as_ref()
            .filter(|html| !html.pages.is_empty())
            .ok_or_else(|| ScrapeError::NoHorseSource(site.id.to_string()))?;

        Ok(Self {
            site,
            selectors,
            fetcher,
        })
    }
}

#[async_trait]
impl HorseSource for HtmlSource {
    fn site(&self) -> &'static SiteConfig {
        self.site
    }

    async fn collect_horse(&self, link: &str) -> Result<HorseRecord> {
        let mut pages = Vec::with_capacity(self.selectors.pages.len());

        for template in self.selectors.pages {
            let url = template.replace("{id}", link);
            let body = match self.selectors.form {
                Some(form) => self.fetcher.submit(&url, &form.replace("{id}", link)).await,
                None => self.fetcher.fetch(&url).await,
            }
            .with_context(|| format!("Failed to fetch {}", url))?;
            pages.push(body);
        }

        let ctx = Context::new(self.site);
        let horse = parse_horse(&ctx, link, &pages)?;

        info!(
            "Collected {} ({}) from {}",
            horse.name.as_deref().unwrap_or("?"),
            link,
            self.site.id
        );
        Ok(horse)
    }
}

/// Build a horse from the fetched pages of one horse
pub fn parse_horse(ctx: &Context, link: &str, pages: &[String]) -> Result<HorseRecord> {
    let selectors = ctx
        .site
        .html
        .as_ref()
        .ok_or_else(|| ScrapeError::NoHorseSource(ctx.site.id.to_string()))?;

    let documents: Vec<Html> = pages.iter().map(|p| Html::parse_document(p)).collect();

    // ids with path segments only resolve from a full page url
    let subject = match (selectors.form, selectors.pages.first()) {
        (None, Some(page)) => page.replace("{id}", link),
        _ => link.to_string(),
    };

    let mut horse = Loader::new(ctx, &HORSE);
    horse.add_value("link", subject);
    horse.add_value("collection_date", ctx.today.to_string());

    for document in &documents {
        let root = document.root_element();
        for (field, selector) in selectors.fields {
            if let Some(raw) = read_field(root, selector) {
                horse.add_value(field, raw);
            }
        }
    }

    // first page carrying the tree wins
    let cells = documents
        .iter()
        .map(|doc| pedigree_cells(ctx, doc.root_element(), &selectors.pedigree))
        .find(|cells| !cells.is_empty())
        .unwrap_or_default();

    for document in &documents {
        let root = document.root_element();
        if let Some(rows) = &selectors.offspring {
            for fragment in offspring_rows(root, rows.rows, rows) {
                horse.add_value("offspring", fragment);
            }
        }
        if let Some(list) = &selectors.offspring_list {
            for fragment in offspring_list(root, list) {
                horse.add_value("offspring", fragment);
            }
        }
    }

    let mut assembler = PedigreeAssembler::new(ctx.site, link);
    if let (Some(tables), Some(rows)) = (selectors.produce_tables, &selectors.offspring) {
        for (slot, produce) in produce_listings(ctx, &documents, tables, rows) {
            assembler = assembler.splice_offspring(slot, produce);
        }
    }
    let ancestors = assembler.assemble(cells);

    let mut record: HorseRecord = horse.build()?;
    ancestors.attach_to(&mut record);
    Ok(record)
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Text directly inside the element, children excluded
fn own_text(element: ElementRef) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|t| t.trim().to_string()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-blank text after the element among its siblings
fn text_after(element: ElementRef) -> Option<String> {
    element.next_siblings().find_map(|node| {
        let text = match ElementRef::wrap(node) {
            Some(sibling) => text_of(sibling),
            None => node.value().as_text()?.trim().to_string(),
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

fn labelled<'a>(scope: ElementRef<'a>, label: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse("*").ok()?;
    scope
        .select(&selector)
        .find(|el| own_text(*el).starts_with(label))
}

pub(crate) fn read_field(scope: ElementRef, selector: &FieldSelector) -> Option<String> {
    match selector {
        FieldSelector::Css(css) => select_first(scope, css).map(text_of),
        FieldSelector::AfterLabel(label) => labelled(scope, label).and_then(text_after),
        FieldSelector::After(css) => select_first(scope, css).and_then(text_after),
        FieldSelector::AfterParent(label) => {
            let parent = labelled(scope, label)?.parent().and_then(ElementRef::wrap)?;
            parent
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .map(text_of)
                .find(|text| !text.trim().is_empty())
                .map(|text| text.trim().to_string())
        }
        FieldSelector::Prefixed(prefix) => {
            let element = labelled(scope, prefix)?;
            let text = own_text(element);
            let rest = text.strip_prefix(prefix)?.trim();
            (!rest.is_empty()).then(|| rest.to_string())
        }
        FieldSelector::Attr(css, attr) => {
            select_first(scope, css).and_then(|el| el.value().attr(attr).map(str::to_string))
        }
    }
}

/// One ancestor cell; `None` when the cell holds no linked horse
fn cell_horse(ctx: &Context, sel: &PedigreeCells, cell: ElementRef) -> Option<HorseRecord> {
    let anchor = match sel.anchor {
        Some(css) => select_first(cell, css)?,
        None => cell,
    };
    let name = match sel.name {
        Some(css) => select_first(anchor, css).map(text_of),
        None => Some(text_of(anchor)),
    };

    if let (Some(empty), Some(name)) = (sel.empty_text, &name) {
        if name.trim() == empty {
            return None;
        }
    }

    let link = match sel.link_attr {
        Some(attr) => anchor.value().attr(attr).map(str::to_string),
        None => name.as_deref().and_then(name_link),
    };
    let birthdate = sel.birthdate.and_then(|css| {
        let selector = Selector::parse(css).ok()?;
        cell.select(&selector)
            .map(text_of)
            .find(|text| text.contains(|c: char| c.is_ascii_digit()))
    });

    let fragment = json!({
        "link": link,
        "name": name,
        "country": name,
        "birthdate": birthdate,
    });
    build_fragment(ctx, &HORSE, &fragment).ok()
}

/// Stand-in id for ancestors listed without one, `"Ultra Bo (NL)"` → `"ULTRA-BO"`
fn name_link(name: &str) -> Option<String> {
    horse::name(name).map(|name| name.split_whitespace().collect::<Vec<_>>().join("-"))
}

/// Ancestor cells in the site's pedigree layout
fn pedigree_cells(
    ctx: &Context,
    scope: ElementRef,
    sel: &PedigreeCells,
) -> Vec<Option<HorseRecord>> {
    let Ok(selector) = Selector::parse(sel.cells) else {
        return Vec::new();
    };
    let cells = scope.select(&selector);

    match sel.keyed_by {
        Some(attr) => {
            let nodes: Vec<((u32, u32), HorseRecord)> = cells
                .filter_map(|cell| {
                    let slot = parse_key(cell.value().attr(attr)?)?;
                    Some((slot, cell_horse(ctx, sel, cell)?))
                })
                .collect();

            if nodes.is_empty() {
                Vec::new()
            } else {
                ctx.site.pedigree.place(nodes)
            }
        }
        None => cells
            .skip(sel.leading_cells)
            .map(|cell| cell_horse(ctx, sel, cell))
            .collect(),
    }
}

/// Raw offspring fragments from the rows matched by `rows_css`
fn offspring_rows(scope: ElementRef, rows_css: &str, sel: &OffspringRows) -> Vec<Value> {
    let (Ok(rows), Ok(td)) = (Selector::parse(rows_css), Selector::parse("td")) else {
        return Vec::new();
    };

    scope
        .select(&rows)
        .filter_map(|row| {
            let anchor = select_first(row, sel.anchor)?;
            let link = anchor.value().attr(sel.link_attr)?;
            let name = select_first(row, sel.name).map(text_of);
            let columns: Vec<String> = row.select(&td).map(text_of).collect();
            let column = |n: usize| n.checked_sub(1).and_then(|i| columns.get(i)).cloned();

            Some(json!({
                "link": link,
                "name": name,
                "country": name,
                "birthdate": column(sel.birthdate_col),
                "sex": column(sel.sex_col),
                "registration": sel.registration_col.and_then(column),
            }))
        })
        .collect()
}

/// Raw offspring fragments from the anchors following a label
fn offspring_list(scope: ElementRef, sel: &OffspringList) -> Vec<Value> {
    let Ok(anchors) = Selector::parse("a") else {
        return Vec::new();
    };
    let Some(list) = labelled(scope, sel.label)
        .and_then(|label| label.next_siblings().find_map(ElementRef::wrap))
    else {
        return Vec::new();
    };

    list.select(&anchors)
        .filter_map(|anchor| {
            let link = anchor.value().attr(sel.link_attr)?;
            let name = text_of(anchor);
            Some(json!({"link": link, "name": name, "country": name}))
        })
        .collect()
}

/// Produce listings of tail-female dams, paired with their tree slots
fn produce_listings(
    ctx: &Context,
    documents: &[Html],
    tables_css: &str,
    sel: &OffspringRows,
) -> Vec<((u32, u32), Vec<HorseRecord>)> {
    let Ok(tables) = Selector::parse(tables_css) else {
        return Vec::new();
    };

    let listings = documents
        .iter()
        .flat_map(|doc| doc.select(&tables).collect::<Vec<_>>());

    ctx.site
        .dam_offspring_slots
        .iter()
        .zip(listings)
        .map(|(slot, table)| {
            let produce: Vec<HorseRecord> = offspring_rows(table, "tr", sel)
                .iter()
                .filter_map(|fragment| match build_fragment(ctx, &HORSE, fragment) {
                    Ok(horse) => Some(horse),
                    Err(e) => {
                        debug!("Skipping produce row: {}", e);
                        None
                    }
                })
                .collect();
            (*slot, produce)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::{DENMARK, FRANCE, GERMANY, HOLLAND, SPAIN};
    use crate::sources::testing::StaticFetcher;
    use crate::types::Sex;
    use chrono::NaiveDate;

    fn ctx(site: &'static SiteConfig) -> Context {
        Context::with_today(site, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn denmark_page() -> String {
        let cells: String = (0..14)
            .map(|i| {
                if i == 4 {
                    "<td class=\"plain_odd\"></td>".to_string()
                } else {
                    format!(
                        "<td><a href=\"../hast/visa/{}\"><span>Ancestor {}</span></a></td>",
                        100 + i,
                        i
                    )
                }
            })
            .collect();

        format!(
            r#"<html><body><div id="content">
            <h1><span class="notranslate">Tarok (DK)</span> <span class="comment">D-2005-01</span>
                <span class="ueln">208001200500123</span></h1>
            <table class="latte"><tr><td>Brun</td><td>hoppe</td><td>12.05.2005</td></tr></table>
            <table class="latte"><tr><td>Opdrætter</td><td>Stutteri Lyngbo</td></tr></table>
            <div><strong>Microchipkode</strong> <span>208098100012345</span></div>
            <table id="horseDescent"><tr>{}</tr></table>
            <table class="green expand">
                <tr><th>Navn</th><th>År</th><th>Farve</th><th>Køn</th></tr>
                <tr><td><a href="../hast/visa/555"><span class="notranslate">Tarok Junior</span></a></td>
                    <td>2012</td><td>brun</td><td>hingst</td></tr>
            </table>
            </div></body></html>"#,
            cells
        )
    }

    #[tokio::test]
    async fn test_collect_denmark() {
        let fetcher = StaticFetcher::default()
            .with_page("http://195.198.34.45/trav/hast/visa/12345", denmark_page());
        let source = HtmlSource::new(&DENMARK, Arc::new(fetcher)).unwrap();

        let horse = source.collect_horse("12345").await.unwrap();

        assert_eq!(horse.link.as_deref(), Some("12345"));
        assert_eq!(horse.name.as_deref(), Some("TAROK"));
        assert_eq!(horse.country.as_deref(), Some("DK"));
        assert_eq!(horse.registration.as_deref(), Some("D-2005-01"));
        assert_eq!(horse.ueln.as_deref(), Some("208001200500123"));
        assert_eq!(horse.sex, Some(Sex::Mare));
        assert_eq!(horse.birthdate.as_deref(), Some("2005-05-12"));
        assert_eq!(horse.breeder.as_deref(), Some("Stutteri Lyngbo"));
        assert_eq!(horse.chip.as_deref(), Some("208098100012345"));

        // pre-order cells: 0 sire, 1 sire's sire, 4 sire's dam, 7 dam
        let sire = horse.sire.as_ref().unwrap();
        assert_eq!(sire.link.as_deref(), Some("100"));
        assert_eq!(sire.sire.as_ref().unwrap().link.as_deref(), Some("101"));
        assert!(sire.dam.is_none());
        let dam = horse.dam.as_ref().unwrap();
        assert_eq!(dam.link.as_deref(), Some("107"));
        assert_eq!(dam.dam.as_ref().unwrap().dam.as_ref().unwrap().link.as_deref(), Some("113"));

        assert_eq!(horse.offspring.len(), 1);
        let foal = &horse.offspring[0];
        assert_eq!(foal.link.as_deref(), Some("555"));
        assert_eq!(foal.name.as_deref(), Some("TAROK JUNIOR"));
        assert_eq!(foal.sex, Some(Sex::Horse));
        assert_eq!(foal.birthdate.as_deref(), Some("2012-01-01"));
    }

    #[test]
    fn test_france_keyed_cells() {
        let page = r##"<html><body>
            <div class="title-cheval__name">BOLD EAGLE (FR)</div>
            <ul><li><span>Sexe</span> <strong>M</strong></li><li><span>Année</span> <strong>2011</strong></li></ul>
            <div class="root">
                <a id="1_1" href="/stats/fiche-cheval/ready-cash/ZDA/">READY CASH</a>
                <a id="1_2" href="#">-</a>
                <a id="2_1" href="/stats/fiche-cheval/kaisy-dream/ZDB/">KAISY DREAM</a>
                <a id="2_3" href="/stats/fiche-cheval/orphan/ZDC/">ORPHAN</a>
            </div>
            </body></html>"##;

        let horse = parse_horse(&ctx(&FRANCE), "bold-eagle/ZDE", &[page.to_string()]).unwrap();

        assert_eq!(horse.name.as_deref(), Some("BOLD EAGLE"));
        assert_eq!(horse.sex, Some(Sex::Horse));
        assert_eq!(horse.birthdate.as_deref(), Some("2011-01-01"));

        let sire = horse.sire.as_ref().unwrap();
        assert_eq!(sire.link.as_deref(), Some("ready-cash/ZDA"));
        assert_eq!(sire.sire.as_ref().unwrap().link.as_deref(), Some("kaisy-dream/ZDB"));
        // the dam cell is "-", her sire is not attached anywhere
        assert!(horse.dam.is_none());
        assert_eq!(horse.ancestry_depth(), 2);
    }

    #[test]
    fn test_germany_produce_splice() {
        let anchors: String = (0..62)
            .map(|i| format!("<a data-traberid=\"{}\">Traber {}</a>", 1000 + i, i))
            .collect();
        let produce = |ids: &[u32]| -> String {
            let rows: String = ids
                .iter()
                .map(|id| {
                    format!(
                        "<tr><td>2010</td><td><a data-traberid=\"{}\">Fohlen {}</a></td><td>x</td><td>S</td></tr>",
                        id, id
                    )
                })
                .collect();
            format!("<table class=\"produkte\">{}</table>", rows)
        };

        let page = format!(
            r#"<html><body>
            <span>ID: 98765</span>
            <table><tr><td>Name des Trabers</td><td>Zola Boko (IT)</td></tr>
                   <tr><td>Geschlecht</td><td>Stute</td></tr></table>
            <div class="generations">{}</div>
            {}{}
            </body></html>"#,
            anchors,
            produce(&[7001, 7002]),
            produce(&[7101]),
        );

        let horse = parse_horse(&ctx(&GERMANY), "98765", &[page]).unwrap();

        assert_eq!(horse.link.as_deref(), Some("98765"));
        assert_eq!(horse.name.as_deref(), Some("ZOLA BOKO"));
        assert_eq!(horse.country.as_deref(), Some("IT"));
        assert_eq!(horse.sex, Some(Sex::Mare));
        assert_eq!(horse.ancestry_depth(), 5);

        // deepest-first: the parents are the last two cells
        let dam = horse.dam.as_ref().unwrap();
        assert_eq!(dam.link.as_deref(), Some("1061"));
        assert_eq!(dam.sex, Some(Sex::Mare));
        assert_eq!(dam.offspring.len(), 2);
        assert_eq!(dam.offspring[0].link.as_deref(), Some("7001"));

        let second_dam = dam.dam.as_ref().unwrap();
        assert_eq!(second_dam.offspring.len(), 1);
        assert!(horse.sire.as_ref().unwrap().offspring.is_empty());
    }

    fn holland_page() -> String {
        let cells: String = (1..=30)
            .map(|i| match i {
                1 => "<td><strong>Love You</strong> H <span>01-05-2001</span></td>".to_string(),
                9 => "<td><strong>N.V.T.</strong></td>".to_string(),
                _ => format!("<td><strong>Paard {}</strong></td>", i),
            })
            .collect();

        format!(
            r#"<div class="ndr-paard">
            <div><label>Naam</label><span>Ultra Bo</span></div>
            <div><label>Stamboeknummer</label><span>S120046</span></div>
            <div><label>Geslacht</label><span>Merrie</span></div>
            <div><label>Geboortedatum</label><span>12-03-2010</span></div>
            <div><label>Fokker</label><span>J. de Vries</span></div>
            <div id="ndr-tab-stamboom"><table><tr><td><strong>Ultra Bo</strong></td>{}</tr></table></div>
            </div>"#,
            cells
        )
    }

    #[tokio::test]
    async fn test_collect_holland() {
        let fetcher = Arc::new(StaticFetcher::default().with_form(
            "https://www.ndr.nl/wp-admin/admin-ajax.php",
            "action=do_search&categorie=paard&type=draf&id=S120046",
            holland_page(),
        ));
        let source = HtmlSource::new(&HOLLAND, fetcher.clone()).unwrap();

        let horse = source.collect_horse("S120046").await.unwrap();
        assert_eq!(fetcher.request_count(), 1);

        assert_eq!(horse.link.as_deref(), Some("S120046"));
        assert_eq!(horse.registration.as_deref(), Some("S120046"));
        assert_eq!(horse.name.as_deref(), Some("ULTRA BO"));
        assert_eq!(horse.country.as_deref(), Some("NL"));
        assert_eq!(horse.sex, Some(Sex::Mare));
        assert_eq!(horse.birthdate.as_deref(), Some("2010-03-12"));
        assert_eq!(horse.breeder.as_deref(), Some("J. de Vries"));
        assert_eq!(horse.ancestry_depth(), 4);

        // the leading cell is the horse itself, ancestors follow in pre-order
        let sire = horse.sire.as_ref().unwrap();
        assert_eq!(sire.link.as_deref(), Some("LOVE-YOU"));
        assert_eq!(sire.birthdate.as_deref(), Some("2001-05-01"));
        assert_eq!(sire.sire.as_ref().unwrap().link.as_deref(), Some("PAARD-2"));
        assert!(sire.dam.is_none());

        let dam = horse.dam.as_ref().unwrap();
        assert_eq!(dam.link.as_deref(), Some("PAARD-16"));
        assert_eq!(dam.sire.as_ref().unwrap().link.as_deref(), Some("PAARD-17"));
        assert_eq!(dam.dam.as_ref().unwrap().link.as_deref(), Some("PAARD-24"));
    }

    #[tokio::test]
    async fn test_holland_needs_a_form() {
        let fetcher = StaticFetcher::default()
            .with_page("https://www.ndr.nl/wp-admin/admin-ajax.php", holland_page());
        let source = HtmlSource::new(&HOLLAND, Arc::new(fetcher)).unwrap();

        assert!(source.collect_horse("S120046").await.is_err());
    }

    #[test]
    fn test_spain_level_order() {
        let cells: String = (0..14)
            .map(|i| {
                if i == 3 {
                    "<td class=\"recuadroTD\">&nbsp;</td>".to_string()
                } else {
                    format!(
                        "<td class=\"recuadroTD\"><a href=\"resultados_por_caballo.php?id={}&pagina=1\">Caballo {}</a><br><span>0{}/04/2001</span></td>",
                        100 + i,
                        i,
                        1 + i % 9
                    )
                }
            })
            .collect();

        let page = format!(
            r#"<html><body>
            <h4><span>Cometa Son Pere (ES)</span></h4>
            <h3><small><span>15/04/2012</span></small></h3>
            <table>
                <tr><td>Código:</td><td>724015000123456</td></tr>
                <tr><td>Sexo:</td><td>Hembra</td></tr>
                <tr><td>Criador:</td><td>Son Pere S.L.</td></tr>
                <tr><td>Hijos:</td><td>
                    <a href="resultados_por_caballo.php?id=7001&pagina=1">Foal One</a>,
                    <a href="resultados_por_caballo.php?id=7002&pagina=1">Foal Two</a>
                </td></tr>
            </table>
            <table><tr>{}</tr></table>
            </body></html>"#,
            cells
        );

        let horse = parse_horse(&ctx(&SPAIN), "4321", &[page]).unwrap();

        assert_eq!(horse.link.as_deref(), Some("4321"));
        assert_eq!(horse.name.as_deref(), Some("COMETA SON PERE"));
        assert_eq!(horse.country.as_deref(), Some("ES"));
        assert_eq!(horse.ueln.as_deref(), Some("724015000123456"));
        assert_eq!(horse.sex, Some(Sex::Mare));
        assert_eq!(horse.birthdate.as_deref(), Some("2012-04-15"));
        assert_eq!(horse.breeder.as_deref(), Some("Son Pere S.L."));

        let foals: Vec<_> = horse.offspring.iter().filter_map(|f| f.link.as_deref()).collect();
        assert_eq!(foals, ["7001", "7002"]);
        assert_eq!(horse.offspring[1].name.as_deref(), Some("FOAL TWO"));

        // level order: 0 sire, 1 dam, 2 and 3 the sire's parents
        let sire = horse.sire.as_ref().unwrap();
        assert_eq!(sire.link.as_deref(), Some("100"));
        assert_eq!(sire.birthdate.as_deref(), Some("2001-04-01"));
        assert_eq!(sire.sire.as_ref().unwrap().link.as_deref(), Some("102"));
        assert!(sire.dam.is_none());

        let dam = horse.dam.as_ref().unwrap();
        assert_eq!(dam.link.as_deref(), Some("101"));
        assert_eq!(dam.sire.as_ref().unwrap().link.as_deref(), Some("104"));
        assert_eq!(horse.ancestry_depth(), 3);
    }

    #[test]
    fn test_germany_not_fetchable() {
        let fetcher = Arc::new(StaticFetcher::default());
        assert!(matches!(
            HtmlSource::new(&GERMANY, fetcher),
            Err(ScrapeError::NoHorseSource(_))
        ));
    }
}
