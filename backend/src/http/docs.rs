//! API documentation generator.
//!
//! Each handler declares an [`EndpointDoc`] next to its definition. At startup
//! [`ApiDoc::generate`] folds those declarations into one OpenAPI 3.1 document,
//! deriving the JSON schemas from the request/response types with `schemars`.
//! The result is served at `/docs/openapi.json`, and `/docs` hosts Swagger UI
//! pointed at it.

use schemars::JsonSchema;
use serde_json::{json, Map, Value};

use super::dto::{ApiError, HealthResponse, Task, ValidationErrors};
use super::handlers;

const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// A named JSON schema derived from a Rust type.
#[derive(Clone, Copy)]
pub struct SchemaRef {
    pub name: &'static str,
    pub schema: fn() -> Value,
}

impl SchemaRef {
    pub const fn of<T: JsonSchema>(name: &'static str) -> Self {
        Self {
            name,
            schema: schema_of::<T>,
        }
    }
}

fn schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_else(|_| json!({"type": "object"}))
}

/// A JSON body with its schema and an example payload.
#[derive(Clone, Copy)]
pub struct BodyDoc {
    pub schema: SchemaRef,
    /// Body is a JSON array of `schema`
    pub array: bool,
    /// Example payload as JSON text
    pub example: &'static str,
}

#[derive(Clone, Copy)]
pub struct ParamDoc {
    pub name: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

#[derive(Clone, Copy)]
pub struct ResponseDoc {
    pub status: u16,
    pub description: &'static str,
    pub body: Option<BodyDoc>,
}

/// Declarative description of one endpoint.
#[derive(Clone, Copy)]
pub struct EndpointDoc {
    /// Lowercase HTTP method, as OpenAPI spells it
    pub method: &'static str,
    /// Path in OpenAPI template form, e.g. `/delete/{id}`
    pub path: &'static str,
    pub operation_id: &'static str,
    pub summary: &'static str,
    pub description: &'static str,
    pub path_params: &'static [ParamDoc],
    pub request: Option<BodyDoc>,
    pub responses: &'static [ResponseDoc],
}

/// Response shared by every endpoint that validates input.
pub const VALIDATION_FAILED: ResponseDoc = ResponseDoc {
    status: 400,
    description: "The request failed validation; every failing field is listed",
    body: Some(BodyDoc {
        schema: SchemaRef::of::<ValidationErrors>("ValidationErrors"),
        array: false,
        example: r#"{"errors": [{"location": "body", "path": "name", "msg": "name is required"}]}"#,
    }),
};

/// Response shared by every endpoint that touches the store.
pub const STORE_FAILED: ResponseDoc = ResponseDoc {
    status: 500,
    description: "The store operation failed, including an unknown task id",
    body: Some(BodyDoc {
        schema: SchemaRef::of::<ApiError>("ApiError"),
        array: false,
        example: r#"{"code": "REPOSITORY_ERROR", "message": "Not found: Task 7 does not exist [operation=delete_task, entity=task, id=7]"}"#,
    }),
};

/// The single task returned by create, update and delete.
pub const TASK_BODY: BodyDoc = BodyDoc {
    schema: SchemaRef::of::<Task>("Task"),
    array: false,
    example: r#"{"id": 1, "name": "Buy milk", "info": "2%", "isDone": true}"#,
};

pub const HEALTH_BODY: BodyDoc = BodyDoc {
    schema: SchemaRef::of::<HealthResponse>("HealthResponse"),
    array: false,
    example: r#"{"status": "ok", "version": "0.1.0", "database": "connected"}"#,
};

/// Generated API description, immutable once built.
#[derive(Debug, Clone)]
pub struct ApiDoc {
    document: Value,
    html: String,
}

impl ApiDoc {
    /// Build the description of the given endpoints.
    pub fn generate(endpoints: &[EndpointDoc]) -> Self {
        let mut components = Map::new();
        let mut paths = Map::new();

        for endpoint in endpoints {
            let operation = operation_object(endpoint, &mut components);
            let item = paths
                .entry(endpoint.path.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(methods) = item {
                methods.insert(endpoint.method.to_string(), operation);
            }
        }

        let mut document = json!({
            "openapi": "3.1.0",
            "info": {
                "title": "Tasks API",
                "version": env!("CARGO_PKG_VERSION"),
                "description": "Create, read, update and delete tasks.",
            },
            "paths": paths,
            "components": { "schemas": components },
        });
        rewrite_refs(&mut document);

        Self {
            document,
            html: swagger_page("/docs/openapi.json"),
        }
    }

    /// Description of every endpoint this crate serves.
    pub fn for_task_api() -> Self {
        Self::generate(handlers::ENDPOINTS)
    }

    /// The OpenAPI document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The interactive documentation page.
    pub fn html(&self) -> &str {
        &self.html
    }
}

fn operation_object(endpoint: &EndpointDoc, components: &mut Map<String, Value>) -> Value {
    let mut operation = Map::new();
    operation.insert("operationId".into(), json!(endpoint.operation_id));
    operation.insert("summary".into(), json!(endpoint.summary));
    operation.insert("description".into(), json!(endpoint.description));

    if !endpoint.path_params.is_empty() {
        let params: Vec<Value> = endpoint
            .path_params
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "in": "path",
                    "required": true,
                    "description": p.description,
                    "schema": { "type": "integer", "format": "int64" },
                    "example": parse_example(p.example),
                })
            })
            .collect();
        operation.insert("parameters".into(), Value::Array(params));
    }

    if let Some(body) = &endpoint.request {
        operation.insert(
            "requestBody".into(),
            json!({
                "required": true,
                "content": { "application/json": media_type(body, components) },
            }),
        );
    }

    let mut responses = Map::new();
    for response in endpoint.responses {
        let mut object = Map::new();
        object.insert("description".into(), json!(response.description));
        if let Some(body) = &response.body {
            object.insert(
                "content".into(),
                json!({ "application/json": media_type(body, components) }),
            );
        }
        responses.insert(response.status.to_string(), Value::Object(object));
    }
    operation.insert("responses".into(), Value::Object(responses));

    Value::Object(operation)
}

fn media_type(body: &BodyDoc, components: &mut Map<String, Value>) -> Value {
    let reference = register(body.schema, components);
    let schema = if body.array {
        json!({ "type": "array", "items": reference })
    } else {
        reference
    };
    json!({ "schema": schema, "example": parse_example(body.example) })
}

/// Add a schema (and any definitions nested in it) to the components map and
/// return a reference to it.
fn register(schema: SchemaRef, components: &mut Map<String, Value>) -> Value {
    if !components.contains_key(schema.name) {
        let mut value = (schema.schema)();
        if let Value::Object(object) = &mut value {
            object.remove("$schema");
            for key in ["$defs", "definitions"] {
                if let Some(Value::Object(defs)) = object.remove(key) {
                    for (name, def) in defs {
                        components.entry(name).or_insert(def);
                    }
                }
            }
        }
        components.insert(schema.name.to_string(), value);
    }
    json!({ "$ref": format!("{}{}", COMPONENTS_PREFIX, schema.name) })
}

/// Point schemars' local references at the shared components section.
fn rewrite_refs(value: &mut Value) {
    match value {
        Value::Object(object) => {
            if let Some(Value::String(reference)) = object.get_mut("$ref") {
                for prefix in ["#/$defs/", "#/definitions/"] {
                    if let Some(name) = reference.strip_prefix(prefix) {
                        *reference = format!("{}{}", COMPONENTS_PREFIX, name);
                        break;
                    }
                }
            }
            object.values_mut().for_each(rewrite_refs);
        }
        Value::Array(items) => items.iter_mut().for_each(rewrite_refs),
        _ => {}
    }
}

fn parse_example(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn swagger_page(spec_url: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Tasks API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {{
      window.ui = SwaggerUIBundle({{ url: "{spec_url}", dom_id: "#swagger-ui" }});
    }};
  </script>
</body>
</html>
"##
    )
}
