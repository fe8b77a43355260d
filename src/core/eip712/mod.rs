//! Typed structured data (EIP-712): model, canonical ordering and hashing.
//!
//! A message flows `TypedMessage` -> `canonicalize` -> `CanonicalMessage` ->
//! `hash::signing_hash`. Signers only ever see the canonical form.

pub mod canonical;
pub mod hash;
pub mod model;

pub use canonical::{canonicalize, canonicalize_json, canonicalize_raw, CanonicalMessage};
pub use model::{
    Domain, FieldDef, FieldType, MessageBody, MessageValue, TypeDefinition, TypeRegistry,
    TypedMessage, DOMAIN_TYPE_NAME,
};
