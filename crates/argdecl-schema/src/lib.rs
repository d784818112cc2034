//! JSON declaration format for argument sets.
//!
//! The types here mirror [`argdecl::ArgDef`] field for field so a set of
//! arguments can live in a file next to the program that parses them:
//!
//! ```json
//! { "args": [
//!   { "labels": ["-v", "--verbose"], "help": "Verbose output" },
//!   { "labels": ["--count"], "arg-count": 1, "type": "int", "default": 1 },
//!   { "name": "input" }
//! ] }
//! ```

use argdecl::{
    ArgDef, ArgParser, ArgValue, ConfigError, ConversionError, TypeRegistry, TypeTag, Value,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid argument set JSON")]
    Json(#[from] serde_json::Error),
    #[error("argument '{name}': invalid default value")]
    Default {
        name: String,
        #[source]
        source: ConversionError,
    },
    #[error("argument '{name}': default values must be scalars or arrays of scalars")]
    UnsupportedDefault { name: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ArgDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Characters stripped from labels when deriving a name, e.g. `"-/"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_prefixes: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub arg_count: usize,
    #[serde(default, skip_serializing_if = "is_false")]
    pub remainder: bool,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub help: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ArgSet {
    #[serde(default)]
    pub args: Vec<ArgDecl>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl ArgDecl {
    /// Name used in error messages before the argument is resolved.
    fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.labels.first().cloned())
            .unwrap_or_else(|| "<unnamed>".to_string())
    }

    fn type_tag(&self) -> TypeTag {
        self.value_type
            .clone()
            .map(TypeTag::from)
            .unwrap_or_default()
    }

    /// The type values end up with once resolved: a labeled `string` option
    /// without values is a flag, so its defaults are read as `bool`.
    fn effective_tag(&self) -> TypeTag {
        let tag = self.type_tag();
        let is_flag = !self.labels.is_empty() && self.arg_count == 0 && !self.remainder;
        if is_flag && tag == TypeTag::STRING {
            TypeTag::BOOL
        } else {
            tag
        }
    }

    /// Build the [`ArgDef`] this declaration describes.
    ///
    /// Every scalar default goes through the converter registered for the
    /// argument's type, so `"default": "8080"` works for a `uint` argument and
    /// `"default": true` on a `string` argument stays a string.
    pub fn to_def(&self, registry: &TypeRegistry) -> Result<ArgDef, SchemaError> {
        let mut def = ArgDef::new()
            .arg_count(self.arg_count)
            .remainder(self.remainder)
            .value_type(self.type_tag())
            .help(self.help.clone());
        if let Some(name) = &self.name {
            def = def.name(name.clone());
        }
        for label in &self.labels {
            def = def.label(label.clone());
        }
        if let Some(prefixes) = &self.label_prefixes {
            def = def.label_prefixes(prefixes.chars());
        }
        if let Some(min) = self.min {
            def = def.min_instances(min);
        }
        if let Some(max) = self.max {
            def = def.max_instances(max);
        }
        if let Some(default) = &self.default {
            if let Some(value) = self.default_value(default, registry)? {
                def = def.default_value(value);
            }
        }
        Ok(def)
    }

    fn default_value(
        &self,
        json: &serde_json::Value,
        registry: &TypeRegistry,
    ) -> Result<Option<ArgValue>, SchemaError> {
        match json {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| self.scalar(item, registry))
                .collect::<Result<Vec<_>, _>>()
                .map(|values| Some(ArgValue::Sequence(values))),
            other => self.scalar(other, registry).map(|v| Some(ArgValue::Scalar(v))),
        }
    }

    fn scalar(
        &self,
        json: &serde_json::Value,
        registry: &TypeRegistry,
    ) -> Result<Value, SchemaError> {
        let token = match json {
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.clone(),
            _ => {
                return Err(SchemaError::UnsupportedDefault {
                    name: self.display_name(),
                });
            }
        };
        registry
            .try_convert(&token, &self.effective_tag())
            .map_err(|source| SchemaError::Default {
                name: self.display_name(),
                source,
            })
    }
}

impl ArgSet {
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_defs(&self, registry: &TypeRegistry) -> Result<Vec<ArgDef>, SchemaError> {
        self.args.iter().map(|a| a.to_def(registry)).collect()
    }

    /// Convert and resolve every declaration.
    pub fn to_parser(&self, registry: &TypeRegistry) -> Result<ArgParser, SchemaError> {
        Ok(ArgParser::new(self.to_defs(registry)?, registry)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "args": [
            { "labels": ["-v", "--verbose"], "help": "Verbose output" },
            { "labels": ["--count"], "arg-count": 1, "type": "int", "default": [1] },
            { "labels": ["/out"], "label-prefixes": "/", "arg-count": 1, "min": 1 },
            { "name": "input" }
        ]
    }"#;

    #[test]
    fn parses_kebab_case_fields() {
        let set = ArgSet::from_json(SAMPLE).unwrap();
        assert_eq!(set.args.len(), 4);
        assert_eq!(set.args[1].arg_count, 1);
        assert_eq!(set.args[1].value_type.as_deref(), Some("int"));
        assert_eq!(set.args[2].label_prefixes.as_deref(), Some("/"));
        assert_eq!(set.args[2].min, Some(1));
    }

    #[test]
    fn builds_a_working_parser() {
        let registry = TypeRegistry::new();
        let parser = ArgSet::from_json(SAMPLE).unwrap().to_parser(&registry).unwrap();
        let names: Vec<&str> = parser.args().iter().map(|a| a.name()).collect();
        assert_eq!(names, ["verbose", "count", "out", "input"]);

        let m = parser.parse(&["/out", "o.txt", "in.txt"]).unwrap();
        assert!(!m.flag("verbose"));
        assert_eq!(m.values("count"), Some(&[Value::Int(1)][..]));
        assert_eq!(m.value("input").and_then(Value::as_str), Some("in.txt"));
    }

    #[test]
    fn string_default_is_converted_by_declared_type() {
        let decl = ArgDecl {
            labels: vec!["--port".to_string()],
            arg_count: 1,
            value_type: Some("uint".to_string()),
            default: Some(serde_json::json!(["8080"])),
            ..Default::default()
        };
        let arg = decl
            .to_def(&TypeRegistry::new())
            .unwrap()
            .resolve(&TypeRegistry::new())
            .unwrap();
        assert_eq!(
            arg.default_value(),
            Some(&ArgValue::Sequence(vec![Value::UInt(8080)]))
        );
    }

    #[test]
    fn bad_default_is_reported() {
        let decl = ArgDecl {
            name: Some("level".to_string()),
            value_type: Some("int".to_string()),
            default: Some(serde_json::json!("high")),
            ..Default::default()
        };
        let err = decl.to_def(&TypeRegistry::new()).unwrap_err();
        match err {
            SchemaError::Default { name, .. } => assert_eq!(name, "level"),
            other => panic!("expected Default, got: {other:?}"),
        }

        let decl = ArgDecl {
            name: Some("level".to_string()),
            default: Some(serde_json::json!({ "a": 1 })),
            ..Default::default()
        };
        assert!(matches!(
            decl.to_def(&TypeRegistry::new()),
            Err(SchemaError::UnsupportedDefault { .. })
        ));
    }

    #[test]
    fn single_default_fills_a_one_value_option() {
        let json = r#"{ "args": [
            { "labels": ["--count"], "arg-count": 1, "type": "int", "default": 1 }
        ] }"#;
        let parser = ArgSet::from_json(json)
            .unwrap()
            .to_parser(&TypeRegistry::new())
            .unwrap();
        assert_eq!(
            parser.args()[0].default_value(),
            Some(&ArgValue::Sequence(vec![Value::Int(1)]))
        );

        let m = parser.parse::<&str>(&[]).unwrap();
        assert_eq!(m.values("count"), Some(&[Value::Int(1)][..]));

        let m = parser.parse(&["--count", "7"]).unwrap();
        assert_eq!(m.values("count"), Some(&[Value::Int(7)][..]));
    }

    #[test]
    fn flag_default_is_read_as_bool() {
        let json = r#"{ "args": [ { "labels": ["--verbose"], "default": "true" } ] }"#;
        let parser = ArgSet::from_json(json)
            .unwrap()
            .to_parser(&TypeRegistry::new())
            .unwrap();
        assert_eq!(
            parser.args()[0].default_value(),
            Some(&ArgValue::Scalar(Value::Bool(true)))
        );
        assert!(parser.parse::<&str>(&[]).unwrap().flag("verbose"));
    }

    #[test]
    fn json_bool_default_follows_the_declared_type() {
        let decl = ArgDecl {
            labels: vec!["--mode".to_string()],
            arg_count: 1,
            default: Some(serde_json::json!([true])),
            ..Default::default()
        };
        let def = decl.to_def(&TypeRegistry::new()).unwrap();
        let arg = def.resolve(&TypeRegistry::new()).unwrap();
        assert_eq!(
            arg.default_value(),
            Some(&ArgValue::Sequence(vec![Value::from("true")]))
        );

        let decl = ArgDecl {
            labels: vec!["--level".to_string()],
            arg_count: 1,
            value_type: Some("int".to_string()),
            default: Some(serde_json::json!(false)),
            ..Default::default()
        };
        assert!(matches!(
            decl.to_def(&TypeRegistry::new()),
            Err(SchemaError::Default { .. })
        ));
    }

    #[test]
    fn config_errors_surface_from_to_parser() {
        let set =
            ArgSet::from_json(r#"{ "args": [ { "labels": ["--n"], "type": "int" } ] }"#).unwrap();
        let err = set.to_parser(&TypeRegistry::new()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Config(ConfigError::NonBoolFlag { .. })
        ));
    }

    #[test]
    fn serialization_skips_defaults() {
        let decl = ArgDecl {
            labels: vec!["--verbose".to_string()],
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&decl).unwrap(),
            r#"{"labels":["--verbose"]}"#
        );
    }
}
