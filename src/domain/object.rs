//! Object Entity
//!
//! A single catalogued thing (book, game, food...) stored inside a container.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity::{now_millis, validate_name, DomainError, DomainResult, Entity};
use super::ids::ObjectId;

/// Free-form property bag preserving JSON value shapes
pub type Properties = Map<String, Value>;

/// Kind of objects a collection holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Food,
    Book,
    #[serde(rename = "videogame")]
    VideoGame,
    Music,
    #[serde(rename = "boardgame")]
    BoardGame,
    #[default]
    General,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Food => "food",
            ObjectType::Book => "book",
            ObjectType::VideoGame => "videogame",
            ObjectType::Music => "music",
            ObjectType::BoardGame => "boardgame",
            ObjectType::General => "general",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "food" => Ok(ObjectType::Food),
            "book" => Ok(ObjectType::Book),
            "videogame" => Ok(ObjectType::VideoGame),
            "music" => Ok(ObjectType::Music),
            "boardgame" => Ok(ObjectType::BoardGame),
            "general" => Ok(ObjectType::General),
            other => Err(DomainError::InvalidInput(format!(
                "invalid object type: {}",
                other
            ))),
        }
    }
}

/// Inputs for the object factory
#[derive(Debug, Clone, Default)]
pub struct ObjectProps {
    pub name: String,
    pub description: String,
    pub object_type: ObjectType,
    pub quantity: Option<f64>,
    pub unit: String,
    pub properties: Properties,
    pub tags: Vec<String>,
    pub expires_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub object_type: ObjectType,
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Expiry as epoch milliseconds (food)
    pub expires_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Object {
    /// Validate props and build a new object with a fresh id
    pub fn new(props: ObjectProps) -> DomainResult<Self> {
        let name = validate_name("object", &props.name)?;
        validate_quantity(props.quantity)?;

        let now = now_millis();
        Ok(Self {
            id: ObjectId::generate(),
            name,
            description: props.description,
            object_type: props.object_type,
            quantity: props.quantity,
            unit: props.unit,
            properties: props.properties,
            tags: props.tags,
            expires_at: props.expires_at,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = validate_name("object", name)?;
        self.touch();
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: Option<f64>) -> DomainResult<()> {
        validate_quantity(quantity)?;
        self.quantity = quantity;
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = now_millis();
    }
}

fn validate_quantity(quantity: Option<f64>) -> DomainResult<()> {
    match quantity {
        Some(q) if !q.is_finite() || q < 0.0 => Err(DomainError::InvalidInput(
            "quantity must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}

impl Entity for Object {
    type Id = ObjectId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
