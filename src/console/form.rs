//! Dynamic bundle-editing form built from the server-declared schema
//!
//! The schema lists which prompt and file keys a bundle must carry; the
//! form exposes one field per key plus the fixed `name` field. Dynamic
//! field names are namespaced with a prefix so they can never collide with
//! `name`, and the prefix is stripped again on serialize, making
//! hydrate/serialize inverses of each other.

use crate::api::{PromptBundle, PromptSchema};
use crate::common::{Error, Result};

/// Prefix for prompt-value fields
pub const PROMPT_PREFIX: &str = "prompts_";
/// Prefix for file-handle fields
pub const FILE_PREFIX: &str = "files_";

/// Which dynamic mapping a field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Prompts,
    Files,
}

impl FieldGroup {
    fn prefix(self) -> &'static str {
        match self {
            Self::Prompts => PROMPT_PREFIX,
            Self::Files => FILE_PREFIX,
        }
    }
}

/// One named field of the bundle form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Namespaced field name (`name`, `prompts_<key>`, or `files_<key>`)
    pub name: String,
    pub value: String,
    pub required: bool,
}

/// A bundle-editing form instantiated from a [`PromptSchema`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleForm {
    fields: Vec<Field>,
}

impl BundleForm {
    /// Build the form for the given schema: a required `name` field, one
    /// required field per prompt key, one optional field per file key.
    pub fn build(schema: &PromptSchema) -> Self {
        let mut fields = vec![Field {
            name: "name".to_string(),
            value: String::new(),
            required: true,
        }];
        for key in &schema.prompts {
            fields.push(Field {
                name: format!("{PROMPT_PREFIX}{key}"),
                value: String::new(),
                required: true,
            });
        }
        for key in &schema.files {
            fields.push(Field {
                name: format!("{FILE_PREFIX}{key}"),
                value: String::new(),
                required: false,
            });
        }
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Current value of a field by its namespaced name
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Set a field by its namespaced name
    pub fn set_value(&mut self, name: &str, value: &str) -> Result<()> {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.to_string();
                Ok(())
            }
            None => Err(Error::FieldNotFound(name.to_string())),
        }
    }

    /// Patch exactly one dynamic field without disturbing the others.
    ///
    /// Used when a file upload completes asynchronously and must report the
    /// assigned handle back into an in-progress edit.
    pub fn set_field(&mut self, group: FieldGroup, key: &str, value: &str) -> Result<()> {
        self.set_value(&format!("{}{}", group.prefix(), key), value)
    }

    /// Fill the form from a saved bundle, or reset it when none is selected.
    ///
    /// With `None` every field returns to its empty default. With a bundle,
    /// `name` and every schema field the bundle knows are set; bundle keys
    /// the schema no longer declares are ignored, and schema fields the
    /// bundle lacks keep their prior value.
    pub fn hydrate(&mut self, bundle: Option<&PromptBundle>) {
        let Some(bundle) = bundle else {
            for field in &mut self.fields {
                field.value.clear();
            }
            return;
        };
        for field in &mut self.fields {
            if field.name == "name" {
                field.value = bundle.name.clone();
            } else if let Some(key) = field.name.strip_prefix(PROMPT_PREFIX) {
                if let Some(value) = bundle.prompts.get(key) {
                    field.value = value.clone();
                }
            } else if let Some(key) = field.name.strip_prefix(FILE_PREFIX) {
                if let Some(value) = bundle.files.get(key) {
                    field.value = value.clone();
                }
            }
        }
    }

    /// Rebuild a bundle from the form values, stripping the field prefixes.
    ///
    /// Empty-valued dynamic fields are omitted, so hydrating a bundle whose
    /// keys are a subset of the schema and serializing again yields the
    /// original bundle.
    pub fn serialize(&self) -> PromptBundle {
        let mut bundle = PromptBundle::default();
        for field in &self.fields {
            if field.name == "name" {
                bundle.name = field.value.clone();
            } else if field.value.is_empty() {
                continue;
            } else if let Some(key) = field.name.strip_prefix(PROMPT_PREFIX) {
                bundle.prompts.insert(key.to_string(), field.value.clone());
            } else if let Some(key) = field.name.strip_prefix(FILE_PREFIX) {
                bundle.files.insert(key.to_string(), field.value.clone());
            }
        }
        bundle
    }

    /// Check that every required field is filled
    pub fn validate(&self) -> Result<()> {
        for field in &self.fields {
            if field.required && field.value.is_empty() {
                return Err(Error::FieldRequired(field.name.clone()));
            }
        }
        Ok(())
    }
}
