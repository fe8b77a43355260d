use crate::core::errors::ExchangeError;
use alloy_primitives::{Address, U256};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// Name under which the domain descriptor's own type is registered.
pub const DOMAIN_TYPE_NAME: &str = "EIP712Domain";

/// Field type vocabulary understood by the encoder and hasher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Address,
    String,
    Bool,
    Bytes32,
    /// Unsigned integer of the given bit width (8..=256, multiple of 8)
    Uint(u16),
    /// Reference to another named type in the registry
    Struct(String),
}

impl FieldType {
    /// Parse a type string such as `uint256` or `address`.
    ///
    /// Anything that is not an elementary type is treated as a struct reference.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "address" => Self::Address,
            "string" => Self::String,
            "bool" => Self::Bool,
            "bytes32" => Self::Bytes32,
            other => other
                .strip_prefix("uint")
                .and_then(|width| width.parse::<u16>().ok())
                .filter(|width| *width >= 8 && *width <= 256 && width % 8 == 0)
                .map_or_else(|| Self::Struct(other.to_string()), Self::Uint),
        }
    }

    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Self::Struct(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => f.write_str("address"),
            Self::String => f.write_str("string"),
            Self::Bool => f.write_str("bool"),
            Self::Bytes32 => f.write_str("bytes32"),
            Self::Uint(width) => write!(f, "uint{}", width),
            Self::Struct(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    fn to_value(&self) -> Value {
        let mut entry = Map::new();
        entry.insert("name".to_string(), Value::String(self.name.clone()));
        entry.insert(
            "type".to_string(),
            Value::String(self.field_type.to_string()),
        );
        Value::Object(entry)
    }
}

/// A named, ordered field list. Field order determines the encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub name: String,
    pub fields: Vec<FieldDef>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Build a definition from a `(field name, type string)` table.
    pub fn from_schema(name: &str, schema: &[(&str, &str)]) -> Self {
        let fields = schema
            .iter()
            .map(|(field, kind)| FieldDef::new(*field, FieldType::parse(kind)))
            .collect();
        Self::new(name, fields)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    fn to_value(&self) -> Value {
        Value::Array(self.fields.iter().map(FieldDef::to_value).collect())
    }
}

/// Insertion-ordered mapping from type name to definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    definitions: Vec<TypeDefinition>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, definition: TypeDefinition) -> Result<(), ExchangeError> {
        if self.contains(&definition.name) {
            return Err(ExchangeError::schema(format!(
                "type `{}` is defined twice",
                definition.name
            )));
        }
        self.definitions.push(definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.definitions.iter().find(|def| def.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn to_value(&self) -> Value {
        let entries = self
            .definitions
            .iter()
            .map(|def| (def.name.clone(), def.to_value()))
            .collect();
        Value::Object(entries)
    }
}

/// Domain descriptor mixed into every signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub name: String,
    pub version: String,
    pub chain_id: Option<u64>,
    pub verifying_contract: Option<Address>,
}

impl Domain {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id: None,
            verifying_contract: None,
        }
    }

    #[must_use]
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    #[must_use]
    pub fn with_verifying_contract(mut self, contract: Address) -> Self {
        self.verifying_contract = Some(contract);
        self
    }

    /// The synthetic `EIP712Domain` definition, listing only the members that are set.
    pub fn type_definition(&self) -> TypeDefinition {
        let mut fields = vec![
            FieldDef::new("name", FieldType::String),
            FieldDef::new("version", FieldType::String),
        ];
        if self.chain_id.is_some() {
            fields.push(FieldDef::new("chainId", FieldType::Uint(256)));
        }
        if self.verifying_contract.is_some() {
            fields.push(FieldDef::new("verifyingContract", FieldType::Address));
        }
        TypeDefinition::new(DOMAIN_TYPE_NAME, fields)
    }

    pub fn to_value(&self) -> Value {
        let mut domain = Map::new();
        domain.insert("name".to_string(), Value::String(self.name.clone()));
        domain.insert("version".to_string(), Value::String(self.version.clone()));
        if let Some(chain_id) = self.chain_id {
            domain.insert("chainId".to_string(), Value::from(chain_id));
        }
        if let Some(contract) = &self.verifying_contract {
            domain.insert(
                "verifyingContract".to_string(),
                Value::String(contract.to_checksum(None)),
            );
        }
        Value::Object(domain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageValue {
    Address(Address),
    String(String),
    Bool(bool),
    Bytes32([u8; 32]),
    Uint(U256),
    Struct(MessageBody),
}

impl MessageValue {
    fn matches(&self, field_type: &FieldType) -> bool {
        match (self, field_type) {
            (Self::Address(_), FieldType::Address)
            | (Self::String(_), FieldType::String)
            | (Self::Bool(_), FieldType::Bool)
            | (Self::Bytes32(_), FieldType::Bytes32)
            | (Self::Struct(_), FieldType::Struct(_)) => true,
            (Self::Uint(value), FieldType::Uint(width)) => value.bit_len() <= *width as usize,
            _ => false,
        }
    }

    /// JSON rendering. Integers that fit in 64 bits stay numeric, larger ones
    /// become decimal strings so no precision is lost.
    fn to_value(&self, registry: &TypeRegistry, field_type: &FieldType) -> Value {
        match self {
            Self::Address(address) => Value::String(address.to_checksum(None)),
            Self::String(text) => Value::String(text.clone()),
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Bytes32(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
            Self::Uint(value) => {
                u64::try_from(*value).map_or_else(|_| Value::String(value.to_string()), Value::from)
            }
            Self::Struct(body) => match field_type
                .struct_name()
                .and_then(|name| registry.get(name))
            {
                Some(definition) => body.to_value(registry, definition),
                None => Value::Null,
            },
        }
    }
}

impl From<Address> for MessageValue {
    fn from(value: Address) -> Self {
        Self::Address(value)
    }
}

impl From<String> for MessageValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for MessageValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<U256> for MessageValue {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<MessageBody> for MessageValue {
    fn from(value: MessageBody) -> Self {
        Self::Struct(value)
    }
}

/// Field values of one struct instance, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBody {
    entries: Vec<(String, MessageValue)>,
}

impl MessageBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<MessageValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<MessageValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&MessageValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Emitted in the definition's field order, not insertion order.
    fn to_value(&self, registry: &TypeRegistry, definition: &TypeDefinition) -> Value {
        let object = definition
            .fields
            .iter()
            .filter_map(|field| {
                self.get(&field.name).map(|value| {
                    (
                        field.name.clone(),
                        value.to_value(registry, &field.field_type),
                    )
                })
            })
            .collect();
        Value::Object(object)
    }
}

/// A validated, domain-separated typed message.
///
/// Built fresh for every order action and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedMessage {
    domain: Domain,
    primary_type: String,
    types: TypeRegistry,
    message: MessageBody,
}

impl TypedMessage {
    /// Validate and assemble a typed message.
    ///
    /// The domain type is registered automatically ahead of the supplied
    /// definitions. Fails with `SchemaError` when the primary type is absent,
    /// a field references an unknown type, references form a cycle, or the
    /// message body does not match its definition.
    pub fn new(
        domain: Domain,
        primary_type: impl Into<String>,
        types: TypeRegistry,
        message: MessageBody,
    ) -> Result<Self, ExchangeError> {
        let primary_type = primary_type.into();
        let domain_definition = domain.type_definition();

        let mut registry = TypeRegistry::new();
        registry.insert(domain_definition.clone())?;
        for definition in types.definitions {
            if definition.name == DOMAIN_TYPE_NAME {
                if definition != domain_definition {
                    return Err(ExchangeError::schema(format!(
                        "`{}` does not match the domain descriptor",
                        DOMAIN_TYPE_NAME
                    )));
                }
                continue;
            }
            registry.insert(definition)?;
        }

        if primary_type == DOMAIN_TYPE_NAME {
            return Err(ExchangeError::schema(
                "the domain type cannot be the primary type",
            ));
        }
        let primary = registry.get(&primary_type).ok_or_else(|| {
            ExchangeError::schema(format!("primary type `{}` is not registered", primary_type))
        })?;

        validate_references(&registry)?;
        validate_body(&registry, primary, &message)?;

        Ok(Self {
            domain,
            primary_type,
            types: registry,
            message,
        })
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn primary_type(&self) -> &str {
        &self.primary_type
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn message(&self) -> &MessageBody {
        &self.message
    }

    /// Structured form in the order a generic typed-data serializer produces:
    /// `types` (domain type first), `primaryType`, `domain`, `message`.
    ///
    /// This is not the signing order; see `canonical::canonicalize`.
    pub fn to_raw(&self) -> Map<String, Value> {
        let mut raw = Map::new();
        raw.insert("types".to_string(), self.types.to_value());
        raw.insert(
            "primaryType".to_string(),
            Value::String(self.primary_type.clone()),
        );
        raw.insert("domain".to_string(), self.domain.to_value());
        let message = self
            .types
            .get(&self.primary_type)
            .map_or(Value::Null, |primary| {
                self.message.to_value(&self.types, primary)
            });
        raw.insert("message".to_string(), message);
        raw
    }
}

fn validate_references(registry: &TypeRegistry) -> Result<(), ExchangeError> {
    for definition in registry.iter() {
        for field in &definition.fields {
            if let Some(target) = field.field_type.struct_name() {
                if !registry.contains(target) {
                    return Err(ExchangeError::schema(format!(
                        "field `{}.{}` references unknown type `{}`",
                        definition.name, field.name, target
                    )));
                }
            }
        }
    }

    let mut done = HashSet::new();
    for definition in registry.iter() {
        let mut path = Vec::new();
        visit(registry, &definition.name, &mut path, &mut done)?;
    }
    Ok(())
}

fn visit<'a>(
    registry: &'a TypeRegistry,
    name: &'a str,
    path: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Result<(), ExchangeError> {
    if done.contains(name) {
        return Ok(());
    }
    if path.contains(&name) {
        return Err(ExchangeError::schema(format!(
            "type references form a cycle: {} -> {}",
            path.join(" -> "),
            name
        )));
    }
    path.push(name);
    if let Some(definition) = registry.get(name) {
        for field in &definition.fields {
            if let Some(target) = field.field_type.struct_name() {
                visit(registry, target, path, done)?;
            }
        }
    }
    path.pop();
    done.insert(name);
    Ok(())
}

fn validate_body(
    registry: &TypeRegistry,
    definition: &TypeDefinition,
    body: &MessageBody,
) -> Result<(), ExchangeError> {
    for key in body.keys() {
        if !definition.field_names().any(|name| name == key) {
            return Err(ExchangeError::schema(format!(
                "`{}` has no field `{}`",
                definition.name, key
            )));
        }
    }

    for field in &definition.fields {
        let value = body.get(&field.name).ok_or_else(|| {
            ExchangeError::schema(format!(
                "message is missing `{}.{}`",
                definition.name, field.name
            ))
        })?;
        if !value.matches(&field.field_type) {
            return Err(ExchangeError::schema(format!(
                "value of `{}.{}` is not a valid `{}`",
                definition.name, field.name, field.field_type
            )));
        }
        if let (MessageValue::Struct(nested), Some(target)) =
            (value, field.field_type.struct_name())
        {
            if let Some(nested_definition) = registry.get(target) {
                validate_body(registry, nested_definition, nested)?;
            }
        }
    }
    Ok(())
}
