//! Site tables.

use super::{
    Annotation, DateRules, FieldSelector, HtmlSelectors, LinkRule, MoneyRules, OffspringList,
    OffspringRows, Pattern, PedigreeCells, SiteConfig, SourceKind, TimeRules, TrackKey,
};
use crate::pedigree::PedigreeLayout;
use crate::types::{Breed, RaceType, Sex, StartMethod};

use Pattern::{Contains, Exact};

const CANONICAL_SEX: [(Pattern, Sex); 3] = [
    (Exact("horse"), Sex::Horse),
    (Exact("mare"), Sex::Mare),
    (Exact("gelding"), Sex::Gelding),
];

const CANONICAL_BREED: [(Pattern, Breed); 3] = [
    (Exact("standardbred"), Breed::Standardbred),
    (Exact("coldblood"), Breed::Coldblood),
    (Exact("thoroughbred"), Breed::Thoroughbred),
];

const CANONICAL_STARTMETHOD: [(Pattern, StartMethod); 3] = [
    (Exact("standing"), StartMethod::Standing),
    (Exact("mobile"), StartMethod::Mobile),
    (Exact("line"), StartMethod::Line),
];

const CANONICAL_RACETYPE: [(Pattern, RaceType); 3] = [
    (Exact("race"), RaceType::Race),
    (Exact("qualifier"), RaceType::Qualifier),
    (Exact("premium"), RaceType::Premium),
];

const DEFAULT_DATES: DateRules = DateRules {
    two_digit_pivot: 70,
    age_is_birthyear: false,
};

pub static SWEDEN: SiteConfig = SiteConfig {
    id: "sweden",
    country: "SE",
    organisation: "Svensk Travsport",
    source: SourceKind::Travsport,

    sex: &[
        CANONICAL_SEX[0],
        CANONICAL_SEX[1],
        CANONICAL_SEX[2],
        (Exact("S"), Sex::Mare),
        (Exact("H"), Sex::Horse),
        (Exact("V"), Sex::Gelding),
        (Exact("stallion"), Sex::Horse),
        (Exact("sto"), Sex::Mare),
        (Exact("hingst"), Sex::Horse),
        (Exact("valack"), Sex::Gelding),
    ],
    breed: &[
        CANONICAL_BREED[0],
        CANONICAL_BREED[1],
        CANONICAL_BREED[2],
        (Exact("V"), Breed::Standardbred),
        (Exact("K"), Breed::Coldblood),
        (Contains("varmblod"), Breed::Standardbred),
        (Contains("kallblod"), Breed::Coldblood),
    ],
    startmethod: &[
        CANONICAL_STARTMETHOD[0],
        CANONICAL_STARTMETHOD[1],
        CANONICAL_STARTMETHOD[2],
        (Exact("V"), StartMethod::Standing),
        (Exact("A"), StartMethod::Mobile),
        (Exact("L"), StartMethod::Line),
        (Exact("volte"), StartMethod::Standing),
        (Exact("auto"), StartMethod::Mobile),
        (Contains("autostart"), StartMethod::Mobile),
        (Contains("linjestart"), StartMethod::Line),
    ],
    default_startmethod: Some(StartMethod::Standing),
    racetype: &[
        CANONICAL_RACETYPE[0],
        CANONICAL_RACETYPE[1],
        CANONICAL_RACETYPE[2],
        (Exact("V"), RaceType::Race),
        (Exact("K"), RaceType::Qualifier),
        (Exact("P"), RaceType::Premium),
        (Contains("kvallopp"), RaceType::Qualifier),
        (Contains("premielopp"), RaceType::Premium),
    ],
    default_racetype: Some(RaceType::Race),
    monte_markers: &["montélopp", "monté"],
    country_names: &[],

    dates: DEFAULT_DATES,
    times: TimeRules {
        implied_minute: true,
        compact_digits: true,
        annotations: &[
            ("kub", Annotation::Ignore),
            ("dist", Annotation::Ignore),
            ("vänd", Annotation::DidNotFinish),
            ("u", Annotation::DidNotFinish),
            ("g", Annotation::Gallop),
            ("d", Annotation::Disqualified),
            ("a", Annotation::Autostart),
        ],
    },
    money: MoneyRules {
        thousands: &[' ', '.', '\u{a0}'],
        decimal: ',',
    },
    show_odds_in_tenths: false,
    distance_slash_part: 0,

    disqualified_markers: &["d", "disk"],
    disqualified_exclusions: &["dist"],
    scratch_markers: &["str", "struken"],
    approved_markers: &["gdk", "gk", "p"],
    approved_negations: &["ej"],
    unknown_breeder: &["okänd", "uppfödare okänd"],
    strip_licence: true,
    link_rules: &[
        LinkRule::After {
            marker: "horse/ts/",
            stop: &['/', '?'],
        },
        LinkRule::After {
            marker: "horses/",
            stop: &['/', '?'],
        },
    ],

    pedigree: PedigreeLayout::LevelOrder { generations: 3 },
    dam_offspring_slots: &[],
    track_key: TrackKey::Name,
    html: None,
};

pub static NORWAY: SiteConfig = SiteConfig {
    id: "norway",
    country: "NO",
    organisation: "Det Norske Travselskap",
    source: SourceKind::Rikstoto,

    sex: &[
        CANONICAL_SEX[0],
        CANONICAL_SEX[1],
        CANONICAL_SEX[2],
        (Exact("hp"), Sex::Mare),
        (Exact("v"), Sex::Gelding),
        (Exact("kh"), Sex::Horse),
        (Exact("h"), Sex::Horse),
        (Exact("hoppe"), Sex::Mare),
        (Exact("vallak"), Sex::Gelding),
        (Exact("hingst"), Sex::Horse),
    ],
    breed: &[
        CANONICAL_BREED[0],
        CANONICAL_BREED[1],
        CANONICAL_BREED[2],
        (Contains("varmblods"), Breed::Standardbred),
        (Contains("kaldblods"), Breed::Coldblood),
    ],
    startmethod: &[
        CANONICAL_STARTMETHOD[0],
        CANONICAL_STARTMETHOD[1],
        CANONICAL_STARTMETHOD[2],
        (Exact("volt"), StartMethod::Standing),
        (Exact("auto"), StartMethod::Mobile),
        (Exact("linje"), StartMethod::Line),
        (Contains("autostart"), StartMethod::Mobile),
        (Contains("voltestart"), StartMethod::Standing),
    ],
    default_startmethod: None,
    racetype: &[
        CANONICAL_RACETYPE[0],
        CANONICAL_RACETYPE[1],
        CANONICAL_RACETYPE[2],
        (Contains("kvalifisering"), RaceType::Qualifier),
        (Contains("premie"), RaceType::Premium),
    ],
    default_racetype: Some(RaceType::Race),
    monte_markers: &["monté", "montè"],
    country_names: &[],

    dates: DEFAULT_DATES,
    times: TimeRules {
        implied_minute: true,
        compact_digits: false,
        annotations: &[
            ("kub", Annotation::Ignore),
            ("dist", Annotation::Ignore),
            ("br", Annotation::DidNotFinish),
            ("g", Annotation::Gallop),
            ("d", Annotation::Disqualified),
            ("a", Annotation::Autostart),
        ],
    },
    money: MoneyRules {
        thousands: &[' ', '.', '\u{a0}'],
        decimal: ',',
    },
    show_odds_in_tenths: false,
    distance_slash_part: 0,

    disqualified_markers: &["d", "disk"],
    disqualified_exclusions: &["dist"],
    scratch_markers: &["str", "strøket"],
    approved_markers: &["gk", "godkjent"],
    approved_negations: &["ikke"],
    unknown_breeder: &["ukjent"],
    strip_licence: true,
    link_rules: &[LinkRule::After {
        marker: "horse/",
        stop: &['/', '?'],
    }],

    pedigree: PedigreeLayout::LevelOrder { generations: 3 },
    dam_offspring_slots: &[],
    track_key: TrackKey::Code,
    html: None,
};

pub static DENMARK: SiteConfig = SiteConfig {
    id: "denmark",
    country: "DK",
    organisation: "Dansk Travsports Centralforbund",
    source: SourceKind::Html,

    sex: &[
        CANONICAL_SEX[0],
        CANONICAL_SEX[1],
        CANONICAL_SEX[2],
        (Exact("hingst"), Sex::Horse),
        (Exact("hoppe"), Sex::Mare),
        (Exact("vallak"), Sex::Gelding),
    ],
    breed: &[
        CANONICAL_BREED[0],
        CANONICAL_BREED[1],
        CANONICAL_BREED[2],
        (Contains("varmblodig"), Breed::Standardbred),
        (Contains("koldblodig"), Breed::Coldblood),
    ],
    startmethod: &[
        CANONICAL_STARTMETHOD[0],
        CANONICAL_STARTMETHOD[1],
        CANONICAL_STARTMETHOD[2],
        (Contains("autostart"), StartMethod::Mobile),
        (Contains("bilstart"), StartMethod::Mobile),
        (Contains("voltestart"), StartMethod::Standing),
    ],
    default_startmethod: Some(StartMethod::Standing),
    racetype: &[
        CANONICAL_RACETYPE[0],
        CANONICAL_RACETYPE[1],
        CANONICAL_RACETYPE[2],
        (Contains("kvalifikation"), RaceType::Qualifier),
        (Contains("præmie"), RaceType::Premium),
    ],
    default_racetype: Some(RaceType::Race),
    monte_markers: &["monté", "montè"],
    country_names: &[],

    dates: DateRules {
        two_digit_pivot: 8,
        age_is_birthyear: false,
    },
    times: TimeRules {
        implied_minute: true,
        compact_digits: false,
        annotations: &[
            ("opg", Annotation::DidNotFinish),
            ("dist", Annotation::Ignore),
            ("g", Annotation::Gallop),
            ("d", Annotation::Disqualified),
            ("a", Annotation::Autostart),
        ],
    },
    money: MoneyRules {
        thousands: &['.'],
        decimal: ',',
    },
    show_odds_in_tenths: false,
    distance_slash_part: 0,

    disqualified_markers: &["d", "disk"],
    disqualified_exclusions: &["dist"],
    scratch_markers: &["udg", "str"],
    approved_markers: &["gk", "godkendt"],
    approved_negations: &["ikke"],
    unknown_breeder: &["ukendt"],
    strip_licence: true,
    link_rules: &[
        LinkRule::Segments {
            marker: "visa",
            count: 1,
        },
        LinkRule::Segments {
            marker: "..",
            count: 1,
        },
        LinkRule::Segments {
            marker: ".",
            count: 1,
        },
    ],

    pedigree: PedigreeLayout::PreOrder { generations: 3 },
    dam_offspring_slots: &[],
    track_key: TrackKey::Name,
    html: Some(HtmlSelectors {
        pages: &["http://195.198.34.45/trav/hast/visa/{id}"],
        form: None,
        rendered: true,
        fields: &[
            ("name", FieldSelector::Css("h1 span.notranslate")),
            ("country", FieldSelector::Css("h1 span.notranslate")),
            ("registration", FieldSelector::Css("h1 span.comment")),
            ("ueln", FieldSelector::Css("h1 span[class*=ueln]")),
            ("sex", FieldSelector::Css("div#content table.latte td:nth-of-type(2)")),
            ("birthdate", FieldSelector::Css("table.latte td:nth-of-type(3)")),
            ("breeder", FieldSelector::Css("table.latte ~ table.latte td:nth-of-type(2)")),
            ("chip", FieldSelector::AfterLabel("Microchipkode")),
        ],
        pedigree: PedigreeCells {
            cells: "table#horseDescent td",
            anchor: Some("a"),
            link_attr: Some("href"),
            name: Some("span"),
            birthdate: None,
            leading_cells: 0,
            keyed_by: None,
            empty_text: None,
        },
        offspring: Some(OffspringRows {
            rows: "table.green.expand tr",
            anchor: "a",
            link_attr: "href",
            name: "span.notranslate",
            birthdate_col: 2,
            sex_col: 4,
            registration_col: None,
        }),
        offspring_list: None,
        produce_tables: None,
    }),
};

pub static FINLAND: SiteConfig = SiteConfig {
    id: "finland",
    country: "FI",
    organisation: "Suomen Hippos",
    source: SourceKind::Html,

    sex: &[
        CANONICAL_SEX[0],
        CANONICAL_SEX[1],
        CANONICAL_SEX[2],
        (Exact("r"), Sex::Gelding),
        (Exact("t"), Sex::Mare),
        (Exact("o"), Sex::Horse),
        (Exact("ruuna"), Sex::Gelding),
        (Exact("tamma"), Sex::Mare),
        (Exact("ori"), Sex::Horse),
    ],
    breed: &[
        CANONICAL_BREED[0],
        CANONICAL_BREED[1],
        CANONICAL_BREED[2],
        (Exact("lämminverinen"), Breed::Standardbred),
        (Exact("suomenhevonen"), Breed::Coldblood),
        (Exact("kylmäverinen"), Breed::Coldblood),
        (Exact("täysiverinen"), Breed::Thoroughbred),
    ],
    startmethod: &[
        CANONICAL_STARTMETHOD[0],
        CANONICAL_STARTMETHOD[1],
        CANONICAL_STARTMETHOD[2],
        (Contains("ryhmälähtö"), StartMethod::Mobile),
        (Contains("autolähtö"), StartMethod::Mobile),
        (Contains("tasoitusajo"), StartMethod::Standing),
        (Contains("linjalähtö"), StartMethod::Line),
    ],
    default_startmethod: Some(StartMethod::Standing),
    racetype: &[
        CANONICAL_RACETYPE[0],
        CANONICAL_RACETYPE[1],
        CANONICAL_RACETYPE[2],
        (Contains("koelähtö"), RaceType::Qualifier),
        (Contains("opetus"), RaceType::Race),
        (Contains("nuoret"), RaceType::Race),
    ],
    default_racetype: Some(RaceType::Race),
    monte_markers: &["monté", "montè"],
    country_names: &[
        ("ranska", "FR"),
        ("suomi", "FI"),
        ("ruotsi", "SE"),
        ("yhdysvallat", "US"),
        ("kanada", "CA"),
        ("norja", "NO"),
        ("tanska", "DK"),
        ("saksa", "DE"),
        ("italia", "IT"),
        ("belgia", "BE"),
        ("alankomaat", "NL"),
        ("hollanti", "NL"),
        ("itävalta", "AT"),
        ("uusi-seelanti", "NZ"),
        ("australia", "AU"),
        ("viro", "EE"),
    ],

    dates: DEFAULT_DATES,
    times: TimeRules {
        implied_minute: true,
        compact_digits: false,
        annotations: &[
            ("hyl", Annotation::Disqualified),
            ("kesk", Annotation::DidNotFinish),
            ("x", Annotation::Gallop),
            ("a", Annotation::Autostart),
        ],
    },
    money: MoneyRules {
        thousands: &[' ', '\u{a0}'],
        decimal: ',',
    },
    show_odds_in_tenths: false,
    distance_slash_part: 0,

    disqualified_markers: &["hyl"],
    disqualified_exclusions: &[],
    scratch_markers: &["p", "poissa"],
    approved_markers: &["hyv"],
    approved_negations: &["hyl"],
    unknown_breeder: &["tuntematon"],
    strip_licence: false,
    link_rules: &[LinkRule::After {
        marker: "?sp=l",
        stop: &['&'],
    }],

    pedigree: PedigreeLayout::PreOrder { generations: 4 },
    dam_offspring_slots: &[],
    track_key: TrackKey::Name,
    html: Some(HtmlSelectors {
        pages: &[
            "http://heppa.hippos.fi/heppa/horse/HorseBasic,$HorseLink.$DirectLink.sdirect?sp=l{id}&sp=X",
            "http://heppa.hippos.fi/heppa/horse/FamilyInfo,$HorseLink.$DirectLink.sdirect?sp=l{id}&sp=X",
        ],
        form: None,
        rendered: true,
        fields: &[
            ("name", FieldSelector::Css("span#horse_name")),
            ("sex", FieldSelector::After("label[for=gender]")),
            ("ueln", FieldSelector::After("label[for=ueln]")),
            ("chip", FieldSelector::After("label[for=chipNo]")),
            ("birthdate", FieldSelector::After("label[for=birthDate]")),
            ("country", FieldSelector::After("label[for=birthCountry]")),
            ("registration", FieldSelector::After("label[for=registerNo]")),
            ("breed", FieldSelector::After("label[for=breed]")),
            ("breeder", FieldSelector::AfterLabel("Kasvattaja")),
        ],
        pedigree: PedigreeCells {
            cells: "table.familytree td",
            anchor: Some("a"),
            link_attr: Some("href"),
            name: None,
            birthdate: None,
            leading_cells: 0,
            keyed_by: None,
            empty_text: None,
        },
        offspring: Some(OffspringRows {
            rows: "table.sortable.no_wrap_table tbody tr",
            anchor: "a",
            link_attr: "href",
            name: "td:nth-child(2)",
            birthdate_col: 3,
            sex_col: 4,
            registration_col: Some(5),
        }),
        offspring_list: None,
        produce_tables: None,
    }),
};

pub static GERMANY: SiteConfig = SiteConfig {
    id: "germany",
    country: "DE",
    organisation: "Hauptverband für Traberzucht",
    source: SourceKind::Html,

    sex: &[
        CANONICAL_SEX[0],
        CANONICAL_SEX[1],
        CANONICAL_SEX[2],
        (Exact("S"), Sex::Mare),
        (Exact("H"), Sex::Horse),
        (Exact("W"), Sex::Gelding),
        (Exact("Stute"), Sex::Mare),
        (Exact("Hengst"), Sex::Horse),
        (Exact("Wallach"), Sex::Gelding),
    ],
    breed: &[
        CANONICAL_BREED[0],
        CANONICAL_BREED[1],
        CANONICAL_BREED[2],
        (Contains("traber"), Breed::Standardbred),
        (Contains("kaltblut"), Breed::Coldblood),
        (Contains("vollblut"), Breed::Thoroughbred),
    ],
    startmethod: &[
        CANONICAL_STARTMETHOD[0],
        CANONICAL_STARTMETHOD[1],
        CANONICAL_STARTMETHOD[2],
        (Contains("autostart"), StartMethod::Mobile),
        (Contains("bänderstart"), StartMethod::Standing),
    ],
    default_startmethod: Some(StartMethod::Standing),
    racetype: &[
        CANONICAL_RACETYPE[0],
        CANONICAL_RACETYPE[1],
        CANONICAL_RACETYPE[2],
        (Contains("qualifikation"), RaceType::Qualifier),
        (Contains("prämie"), RaceType::Premium),
    ],
    default_racetype: Some(RaceType::Race),
    monte_markers: &["trabreiten", "monté"],
    country_names: &[],

    dates: DEFAULT_DATES,
    times: TimeRules {
        implied_minute: true,
        compact_digits: false,
        annotations: &[
            ("disq", Annotation::Disqualified),
            ("aufg", Annotation::DidNotFinish),
            ("gal", Annotation::Gallop),
        ],
    },
    money: MoneyRules {
        thousands: &['.'],
        decimal: ',',
    },
    show_odds_in_tenths: true,
    distance_slash_part: 0,

    disqualified_markers: &["disq", "dis"],
    disqualified_exclusions: &[],
    scratch_markers: &["n.g.", "nicht gestartet"],
    approved_markers: &["bestanden"],
    approved_negations: &["nicht"],
    unknown_breeder: &["unbekannt"],
    strip_licence: false,
    link_rules: &[LinkRule::After {
        marker: "ID:",
        stop: &[' ', '\n'],
    }],

    pedigree: PedigreeLayout::DeepestFirst { generations: 5 },
    dam_offspring_slots: &[(1, 1), (2, 3), (3, 7)],
    track_key: TrackKey::Name,
    html: Some(HtmlSelectors {
        pages: &[],
        form: None,
        rendered: true,
        fields: &[
            ("link", FieldSelector::Prefixed("ID:")),
            ("ueln", FieldSelector::Prefixed("UELN:")),
            ("chip", FieldSelector::Prefixed("CHIP:")),
            ("name", FieldSelector::AfterLabel("Name des Trabers")),
            ("country", FieldSelector::AfterLabel("Name des Trabers")),
            ("sex", FieldSelector::AfterLabel("Geschlecht")),
            ("birthdate", FieldSelector::AfterLabel("Geburtsdatum")),
            ("breeder", FieldSelector::AfterLabel("Züchter")),
        ],
        pedigree: PedigreeCells {
            cells: "div.generations a",
            anchor: None,
            link_attr: Some("data-traberid"),
            name: None,
            birthdate: None,
            leading_cells: 0,
            keyed_by: None,
            empty_text: None,
        },
        offspring: Some(OffspringRows {
            rows: "table.gestuetbuch tr",
            anchor: "td:nth-child(2) a",
            link_attr: "data-traberid",
            name: "td:nth-child(2)",
            birthdate_col: 1,
            sex_col: 4,
            registration_col: None,
        }),
        offspring_list: None,
        produce_tables: Some("table.produkte"),
    }),
};

pub static FRANCE: SiteConfig = SiteConfig {
    id: "france",
    country: "FR",
    organisation: "Le Trot",
    source: SourceKind::Html,

    sex: &[
        CANONICAL_SEX[0],
        CANONICAL_SEX[1],
        CANONICAL_SEX[2],
        (Exact("M"), Sex::Horse),
        (Exact("F"), Sex::Mare),
        (Exact("H"), Sex::Gelding),
        (Exact("mâle"), Sex::Horse),
        (Exact("femelle"), Sex::Mare),
        (Exact("hongre"), Sex::Gelding),
    ],
    breed: &[
        CANONICAL_BREED[0],
        CANONICAL_BREED[1],
        CANONICAL_BREED[2],
        (Contains("trotteur"), Breed::Standardbred),
        (Contains("pur sang"), Breed::Thoroughbred),
    ],
    startmethod: &[
        CANONICAL_STARTMETHOD[0],
        CANONICAL_STARTMETHOD[1],
        CANONICAL_STARTMETHOD[2],
        (Exact("AUT"), StartMethod::Mobile),
        (Contains("autostart"), StartMethod::Mobile),
    ],
    default_startmethod: Some(StartMethod::Standing),
    racetype: &[
        CANONICAL_RACETYPE[0],
        CANONICAL_RACETYPE[1],
        CANONICAL_RACETYPE[2],
        (Contains("qualification"), RaceType::Qualifier),
    ],
    default_racetype: Some(RaceType::Race),
    monte_markers: &["monté"],
    country_names: &[],

    dates: DEFAULT_DATES,
    times: TimeRules {
        implied_minute: false,
        compact_digits: true,
        annotations: &[
            ("da", Annotation::Disqualified),
            ("dm", Annotation::Disqualified),
            ("d", Annotation::Disqualified),
            ("a", Annotation::DidNotFinish),
        ],
    },
    money: MoneyRules {
        thousands: &[' ', '\u{a0}', '.'],
        decimal: ',',
    },
    show_odds_in_tenths: false,
    distance_slash_part: 0,

    disqualified_markers: &["D"],
    disqualified_exclusions: &[],
    scratch_markers: &["NP"],
    approved_markers: &["qualifié"],
    approved_negations: &["non"],
    unknown_breeder: &["inconnu"],
    strip_licence: false,
    link_rules: &[LinkRule::Segments {
        marker: "fiche-cheval",
        count: 2,
    }],

    pedigree: PedigreeLayout::LevelOrder { generations: 5 },
    dam_offspring_slots: &[],
    track_key: TrackKey::Name,
    html: Some(HtmlSelectors {
        pages: &[
            "https://www.letrot.com/stats/fiche-cheval/{id}/courses/dernieres-performances",
            "https://www.letrot.com/stats/fiche-cheval/{id}/elevage/pedigree",
            "https://www.letrot.com/stats/fiche-cheval/{id}/elevage/production",
        ],
        form: None,
        rendered: true,
        fields: &[
            ("name", FieldSelector::Css("div.title-cheval__name")),
            ("country", FieldSelector::Css("div.title-cheval__name")),
            ("sex", FieldSelector::AfterLabel("Sexe")),
            ("birthdate", FieldSelector::AfterLabel("Année")),
            ("breeder", FieldSelector::AfterLabel("Eleveur")),
        ],
        pedigree: PedigreeCells {
            cells: "div.root a[id*='_']",
            anchor: None,
            link_attr: Some("href"),
            name: None,
            birthdate: None,
            leading_cells: 0,
            keyed_by: Some("id"),
            empty_text: Some("-"),
        },
        offspring: Some(OffspringRows {
            rows: "table#result_table tbody tr",
            anchor: "td:nth-child(1) a",
            link_attr: "href",
            name: "td:nth-child(1) a",
            birthdate_col: 2,
            sex_col: 3,
            registration_col: None,
        }),
        offspring_list: None,
        produce_tables: None,
    }),
};

pub static HOLLAND: SiteConfig = SiteConfig {
    id: "holland",
    country: "NL",
    organisation: "Stichting Nederlandse Draf- en Rensport",
    source: SourceKind::Html,

    sex: &[
        CANONICAL_SEX[0],
        CANONICAL_SEX[1],
        CANONICAL_SEX[2],
        (Exact("Ruin"), Sex::Gelding),
        (Exact("Merrie"), Sex::Mare),
        (Exact("Hengst"), Sex::Horse),
        (Exact("R"), Sex::Gelding),
        (Exact("M"), Sex::Mare),
        (Exact("H"), Sex::Horse),
    ],
    breed: &CANONICAL_BREED,
    startmethod: &[
        CANONICAL_STARTMETHOD[0],
        CANONICAL_STARTMETHOD[1],
        CANONICAL_STARTMETHOD[2],
        (Contains("autostart"), StartMethod::Mobile),
    ],
    default_startmethod: Some(StartMethod::Standing),
    racetype: &[
        CANONICAL_RACETYPE[0],
        CANONICAL_RACETYPE[1],
        CANONICAL_RACETYPE[2],
        (Contains("kwalificatie"), RaceType::Qualifier),
    ],
    default_racetype: Some(RaceType::Race),
    monte_markers: &["monté", "onder het zadel"],
    country_names: &[],

    dates: DateRules {
        two_digit_pivot: 70,
        age_is_birthyear: true,
    },
    times: TimeRules {
        implied_minute: false,
        compact_digits: false,
        annotations: &[],
    },
    money: MoneyRules {
        thousands: &['.'],
        decimal: ',',
    },
    show_odds_in_tenths: false,
    distance_slash_part: 0,

    disqualified_markers: &["A"],
    disqualified_exclusions: &[],
    scratch_markers: &["NS"],
    approved_markers: &[],
    approved_negations: &[],
    unknown_breeder: &["onbekend"],
    strip_licence: false,
    link_rules: &[LinkRule::After {
        marker: "paard/",
        stop: &['/', '?'],
    }],

    pedigree: PedigreeLayout::PreOrder { generations: 4 },
    dam_offspring_slots: &[],
    track_key: TrackKey::Name,
    html: Some(HtmlSelectors {
        pages: &["https://www.ndr.nl/wp-admin/admin-ajax.php"],
        form: Some("action=do_search&categorie=paard&type=draf&id={id}"),
        rendered: false,
        fields: &[
            ("name", FieldSelector::AfterLabel("Naam")),
            ("registration", FieldSelector::AfterLabel("Stamboeknummer")),
            ("link", FieldSelector::AfterLabel("Stamboeknummer")),
            ("country", FieldSelector::AfterLabel("Stamboeknummer")),
            ("sex", FieldSelector::AfterLabel("Geslacht")),
            ("birthdate", FieldSelector::AfterLabel("Geboortedatum")),
            ("breeder", FieldSelector::AfterLabel("Fokker")),
        ],
        // the first cell is the horse itself
        pedigree: PedigreeCells {
            cells: "div#ndr-tab-stamboom td",
            anchor: None,
            link_attr: None,
            name: Some("strong"),
            birthdate: Some("span"),
            leading_cells: 1,
            keyed_by: None,
            empty_text: Some("N.V.T."),
        },
        offspring: None,
        offspring_list: None,
        produce_tables: None,
    }),
};

pub static BELGIUM: SiteConfig = SiteConfig {
    id: "belgium",
    country: "BE",
    organisation: "Trotting Belge",
    source: SourceKind::Trotting,

    sex: &[
        CANONICAL_SEX[0],
        CANONICAL_SEX[1],
        CANONICAL_SEX[2],
        (Exact("étalon"), Sex::Horse),
        (Exact("jument"), Sex::Mare),
        (Exact("hongre"), Sex::Gelding),
        (Exact("male"), Sex::Horse),
        (Exact("femelle"), Sex::Mare),
    ],
    breed: &CANONICAL_BREED,
    startmethod: &[
        CANONICAL_STARTMETHOD[0],
        CANONICAL_STARTMETHOD[1],
        CANONICAL_STARTMETHOD[2],
        (Contains("autostart"), StartMethod::Mobile),
    ],
    default_startmethod: Some(StartMethod::Standing),
    racetype: &CANONICAL_RACETYPE,
    default_racetype: Some(RaceType::Race),
    monte_markers: &["monté"],
    country_names: &[
        ("belgique", "BE"),
        ("italie", "IT"),
        ("france", "FR"),
        ("états-unis", "US"),
        ("pays-bas", "NL"),
        ("suède", "SE"),
        ("norvège", "NO"),
        ("australie", "AU"),
        ("autriche", "AT"),
        ("danemark", "DK"),
        ("estonie", "EE"),
        ("finlande", "FI"),
        ("allemagne", "DE"),
        ("lettonie", "LV"),
        ("lituanie", "LT"),
        ("canada", "CA"),
        ("espagne", "ES"),
    ],

    dates: DEFAULT_DATES,
    times: TimeRules {
        implied_minute: false,
        compact_digits: false,
        annotations: &[
            ("da", Annotation::Disqualified),
            ("d", Annotation::Disqualified),
            ("a", Annotation::DidNotFinish),
        ],
    },
    money: MoneyRules {
        thousands: &[' ', '.', '\u{a0}'],
        decimal: ',',
    },
    show_odds_in_tenths: false,
    distance_slash_part: 0,

    disqualified_markers: &["D"],
    disqualified_exclusions: &[],
    scratch_markers: &["NP"],
    approved_markers: &[],
    approved_negations: &[],
    unknown_breeder: &["rien", "inconnu"],
    strip_licence: false,
    link_rules: &[LinkRule::After {
        marker: "id=",
        stop: &['&'],
    }],

    pedigree: PedigreeLayout::LevelOrder { generations: 4 },
    dam_offspring_slots: &[(1, 1), (2, 3), (3, 7), (4, 15)],
    track_key: TrackKey::Name,
    html: None,
};

pub static SPAIN: SiteConfig = SiteConfig {
    id: "spain",
    country: "ES",
    organisation: "Federació Balear de Trot",
    source: SourceKind::Html,

    sex: &[
        CANONICAL_SEX[0],
        CANONICAL_SEX[1],
        CANONICAL_SEX[2],
        (Exact("Macho"), Sex::Horse),
        (Exact("Caballo Castrado"), Sex::Gelding),
        (Exact("Macho Castrado"), Sex::Gelding),
        (Exact("Castrado"), Sex::Gelding),
        (Exact("Hembra"), Sex::Mare),
        (Exact("M"), Sex::Horse),
        (Exact("H"), Sex::Mare),
        (Exact("C"), Sex::Gelding),
    ],
    breed: &CANONICAL_BREED,
    startmethod: &[
        CANONICAL_STARTMETHOD[0],
        CANONICAL_STARTMETHOD[1],
        CANONICAL_STARTMETHOD[2],
        (Contains("autostart"), StartMethod::Mobile),
    ],
    default_startmethod: Some(StartMethod::Standing),
    racetype: &CANONICAL_RACETYPE,
    default_racetype: Some(RaceType::Race),
    monte_markers: &["monta", "monté"],
    country_names: &[],

    dates: DEFAULT_DATES,
    times: TimeRules {
        implied_minute: false,
        compact_digits: false,
        annotations: &[],
    },
    money: MoneyRules {
        thousands: &['.'],
        decimal: ',',
    },
    show_odds_in_tenths: false,
    distance_slash_part: 0,

    disqualified_markers: &["D"],
    disqualified_exclusions: &[],
    scratch_markers: &["R"],
    approved_markers: &[],
    approved_negations: &[],
    unknown_breeder: &["desconocido"],
    strip_licence: false,
    link_rules: &[
        LinkRule::After {
            marker: "idcaballo=",
            stop: &['&'],
        },
        LinkRule::After {
            marker: "id=",
            stop: &['&'],
        },
    ],

    pedigree: PedigreeLayout::LevelOrder { generations: 3 },
    dam_offspring_slots: &[],
    track_key: TrackKey::Name,
    html: Some(HtmlSelectors {
        pages: &[
            "https://www.federaciobaleardetrot.com/resultados_por_caballo.php?id={id}&pagina=1",
        ],
        form: None,
        rendered: false,
        fields: &[
            ("name", FieldSelector::Css("h4 span")),
            ("country", FieldSelector::Css("h4 span")),
            ("ueln", FieldSelector::AfterLabel("Código:")),
            ("birthdate", FieldSelector::Css("h3 small span")),
            ("sex", FieldSelector::AfterLabel("Sexo:")),
            ("breeder", FieldSelector::AfterLabel("Criador:")),
        ],
        pedigree: PedigreeCells {
            cells: "td.recuadroTD",
            anchor: Some("a"),
            link_attr: Some("href"),
            name: None,
            birthdate: Some("span"),
            leading_cells: 0,
            keyed_by: None,
            empty_text: None,
        },
        offspring: None,
        offspring_list: Some(OffspringList {
            label: "Hijos:",
            link_attr: "href",
        }),
        produce_tables: None,
    }),
};
