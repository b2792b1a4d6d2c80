//! Item loader: collects raw values per field and builds canonical records.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::schema::{Aggregate, FieldRule, Schema};
use crate::error::{Result, ScrapeError};
use crate::normalize::Context;

/// Accumulates values for one entity.
///
/// Every value runs through its field's chain as it is added; the
/// aggregation policy is applied on output.
pub struct Loader<'a> {
    ctx: &'a Context,
    schema: &'static Schema,
    values: Vec<Vec<Value>>,
}

impl<'a> Loader<'a> {
    pub fn new(ctx: &'a Context, schema: &'static Schema) -> Self {
        Self {
            ctx,
            schema,
            values: vec![Vec::new(); schema.fields.len()],
        }
    }

    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Add one raw value; arrays add each of their elements
    pub fn add_value(&mut self, field: &str, raw: impl Into<Value>) -> &mut Self {
        let Some(index) = self.index_of(field) else {
            debug!("{} has no field {}", self.schema.entity, field);
            return self;
        };

        match raw.into() {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    self.push(index, item);
                }
            }
            value => self.push(index, value),
        }

        self
    }

    /// Add a value that is already canonical, bypassing the chain
    pub fn add_record(&mut self, field: &str, record: impl serde::Serialize) -> &mut Self {
        let Some(index) = self.index_of(field) else {
            debug!("{} has no field {}", self.schema.entity, field);
            return self;
        };

        match serde_json::to_value(record) {
            Ok(Value::Null) => {}
            Ok(value) => self.values[index].push(value),
            Err(e) => warn!("Failed to add {} to {}: {}", field, self.schema.entity, e),
        }

        self
    }

    /// Aggregated output of one field
    pub fn get_output(&self, field: &str) -> Option<Value> {
        let index = self.index_of(field)?;
        aggregate(&self.schema.fields[index], &self.values[index])
    }

    /// The entity as a JSON object, failing when its identity is unresolved
    pub fn load(&self) -> Result<Value> {
        let mut object = Map::new();

        for (rule, values) in self.schema.fields.iter().zip(&self.values) {
            if let Some(value) = aggregate(rule, values) {
                object.insert(rule.name.to_string(), value);
            }
        }

        if let Some(identity) = self.schema.identity {
            if !object.contains_key(identity) {
                return Err(ScrapeError::MissingIdentity {
                    entity: self.schema.entity,
                    field: identity,
                });
            }
        }

        Ok(Value::Object(object))
    }

    /// Load into a typed record
    pub fn build<T: DeserializeOwned>(&self) -> Result<T> {
        let value = self.load()?;
        serde_json::from_value(value).map_err(|source| ScrapeError::Decode {
            what: self.schema.entity.to_string(),
            source,
        })
    }

    fn index_of(&self, field: &str) -> Option<usize> {
        self.schema.fields.iter().position(|f| f.name == field)
    }

    fn push(&mut self, index: usize, value: Value) {
        let rule = &self.schema.fields[index];

        if let Some(nested) = rule.nested {
            match value {
                Value::Object(_) => match load_fragment(self.ctx, nested, &value) {
                    Ok(loaded) => match (nested.decodes)(&loaded) {
                        Ok(()) => self.values[index].push(loaded),
                        Err(e) => warn!("Dropping {} of {}: {}", rule.name, self.schema.entity, e),
                    },
                    Err(e) => warn!("Dropping {} of {}: {}", rule.name, self.schema.entity, e),
                },
                other => debug!("Ignoring non-object {} value: {}", rule.name, other),
            }
            return;
        }

        let mut value = Some(value);
        for step in rule.chain {
            value = value.and_then(|v| step(self.ctx, v));
        }

        if let Some(value) = value {
            self.values[index].push(value);
        }
    }
}

fn aggregate(rule: &FieldRule, values: &[Value]) -> Option<Value> {
    match rule.aggregate {
        Aggregate::First => values.first().cloned(),
        Aggregate::Join(separator) => {
            let parts: Vec<&str> = values.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(Value::String(parts.join(separator)))
            }
        }
        Aggregate::Collect => {
            if values.is_empty() {
                None
            } else {
                Some(Value::Array(values.to_vec()))
            }
        }
    }
}

/// Run a raw fragment object (field name to raw value or values) through
/// the schema, recursing into nested entities
pub fn load_fragment(ctx: &Context, schema: &'static Schema, fragment: &Value) -> Result<Value> {
    let mut loader = Loader::new(ctx, schema);

    if let Value::Object(fields) = fragment {
        for (field, raw) in fields {
            loader.add_value(field, raw.clone());
        }
    }

    loader.load()
}

/// [`load_fragment`] into a typed record
pub fn build_fragment<T: DeserializeOwned>(
    ctx: &Context,
    schema: &'static Schema,
    fragment: &Value,
) -> Result<T> {
    let value = load_fragment(ctx, schema, fragment)?;
    serde_json::from_value(value).map_err(|source| ScrapeError::Decode {
        what: schema.entity.to_string(),
        source,
    })
}
