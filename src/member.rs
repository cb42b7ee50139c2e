//! Member descriptor classification and parameter-name normalization.
//!
//! The scanner hands us raw member descriptor strings. Classification is
//! syntactic, checked in order:
//!
//! 1. Starts with `@` → annotation; the marker is stripped.
//! 2. Contains `(` and does not start with `<` → method. The `<` exclusion
//!    drops constructor-like descriptors (`<init>(...)`) from emission
//!    entirely; they are neither errors nor surfaced.
//! 3. Otherwise, if non-empty → field.
//!
//! Anything else is a malformed descriptor and fails the whole emission.
//!
//! Parameter lists are normalized into scope-safe tokens so an overloaded
//! method can be emitted under a name that is a legal identifier: dots become
//! [`PATH_SEPARATOR`], `[]` array suffixes become [`ARRAY_MARKER`], and
//! parameters are joined with [`DOUBLE_SEPARATOR`].

use crate::error::ModelError;

/// Replaces `.` inside a name to keep it scope-safe.
pub const PATH_SEPARATOR: &str = "_";
/// Joins normalized parameter tokens.
pub const DOUBLE_SEPARATOR: &str = "__";
/// Separates a method name from its normalized parameter block.
pub const TOKEN_SEPARATOR: &str = "_";
/// Replaces a `[]` array suffix.
pub const ARRAY_MARKER: &str = "$$";
/// The dotted-name separator being normalized away.
pub const DOT_SEPARATOR: &str = ".";

/// One classified member of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberDescriptor {
    /// A field, identified by its plain name.
    Field { name: String },
    /// A method, with its parameter type names in declaration order.
    Method {
        name: String,
        param_types: Vec<String>,
    },
    /// An annotation attached to the type, identified by its type name.
    Annotation { name: String },
}

impl MemberDescriptor {
    /// The plain name of the member.
    pub fn name(&self) -> &str {
        match self {
            MemberDescriptor::Field { name } => name,
            MemberDescriptor::Method { name, .. } => name,
            MemberDescriptor::Annotation { name } => name,
        }
    }
}

/// Classify one raw descriptor.
///
/// Returns `Ok(None)` for constructor-like descriptors, which are skipped.
/// `fqn` is only used for error context.
pub fn classify(fqn: &str, raw: &str) -> Result<Option<MemberDescriptor>, ModelError> {
    if let Some(name) = raw.strip_prefix('@') {
        return Ok(Some(MemberDescriptor::Annotation {
            name: name.to_string(),
        }));
    }

    if let Some(open) = raw.find('(') {
        if raw.starts_with('<') {
            // constructor-like, dropped from emission
            return Ok(None);
        }
        let close = raw
            .find(')')
            .ok_or_else(|| ModelError::malformed(fqn, raw))?;
        if close < open {
            return Err(ModelError::malformed(fqn, raw));
        }
        let name = raw[..open].to_string();
        let params = &raw[open + 1..close];
        let param_types = if params.is_empty() {
            Vec::new()
        } else {
            params.split(", ").map(str::to_string).collect()
        };
        return Ok(Some(MemberDescriptor::Method { name, param_types }));
    }

    if raw.is_empty() {
        return Err(ModelError::malformed(fqn, raw));
    }

    Ok(Some(MemberDescriptor::Field {
        name: raw.to_string(),
    }))
}

/// The fully parameter-normalized name of a method.
///
/// Used only when the plain name is already taken by an earlier overload; the
/// first occurrence always keeps the bare name. A method without parameters
/// normalizes to its bare name.
pub fn normalized_method_name(name: &str, param_types: &[String]) -> String {
    if param_types.is_empty() {
        return name.to_string();
    }
    let blob = param_types
        .iter()
        .map(|p| normalize_param_token(p))
        .collect::<Vec<_>>()
        .join(DOUBLE_SEPARATOR);
    format!("{name}{TOKEN_SEPARATOR}{blob}")
}

/// Normalize one parameter type name into a scope-safe token.
pub fn normalize_param_token(param: &str) -> String {
    param
        .replace(DOT_SEPARATOR, PATH_SEPARATOR)
        .replace("[]", ARRAY_MARKER)
}

/// Reverse [`normalize_param_token`]: recover the dotted parameter type name.
pub fn denormalize_param_token(token: &str) -> String {
    token
        .replace(ARRAY_MARKER, "[]")
        .replace(PATH_SEPARATOR, DOT_SEPARATOR)
}

// ============================================================================
// Tests
// ============================================================================
