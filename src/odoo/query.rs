use serde_json::{json, Map, Value};

/// One `[field, operator, value]` term of an Odoo domain
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl Condition {
    pub fn new(field: &str, operator: &str, value: impl Into<Value>) -> Self {
        Self {
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.into(),
        }
    }

    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Self::new(field, "=", value)
    }

    fn to_value(&self) -> Value {
        json!([self.field, self.operator, self.value])
    }
}

/// Model, filter, field subset and paging of a search
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub model: String,
    pub domain: Vec<Condition>,
    pub fields: Vec<String>,
    pub offset: u32,
    pub limit: Option<u32>,
}

impl Query {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            domain: Vec::new(),
            fields: Vec::new(),
            offset: 0,
            limit: None,
        }
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.domain.push(condition);
        self
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn domain_value(&self) -> Value {
        Value::Array(self.domain.iter().map(Condition::to_value).collect())
    }

    pub(crate) fn search_kwargs(&self) -> Map<String, Value> {
        let mut kwargs = Map::new();
        kwargs.insert("offset".to_string(), json!(self.offset));
        if let Some(limit) = self.limit {
            kwargs.insert("limit".to_string(), json!(limit));
        }
        kwargs
    }

    pub(crate) fn search_read_kwargs(&self) -> Map<String, Value> {
        let mut kwargs = self.search_kwargs();
        if !self.fields.is_empty() {
            kwargs.insert("fields".to_string(), json!(self.fields));
        }
        kwargs
    }
}
