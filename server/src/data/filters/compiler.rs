//! Predicate compilation
//!
//! Turns predicate descriptors into parameterized condition fragments over the
//! JSONB payload column. The parameter index is threaded explicitly: the
//! caller supplies the first free placeholder and receives the next one back.
//!
//! Field names never reach SQL as identifiers or placeholders. They are
//! resolved through the level's allow-list and embedded as quoted literals;
//! values always travel as bound parameters.

use super::error::FilterError;
use super::fields::PayloadFields;
use super::types::{Predicate, QueryParam};
use crate::utils::sql::quote_literal;

/// JSONB column holding per-record field values
pub const PAYLOAD_COLUMN: &str = "data_payload";

/// One compiled condition
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFragment {
    pub sql: String,
    pub placeholder: usize,
}

/// Output of [`compile`]
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    pub fragments: Vec<CompiledFragment>,
    /// One value per fragment, in placeholder order
    pub params: Vec<QueryParam>,
    /// First placeholder index not used by any fragment
    pub next_index: usize,
}

impl CompiledFilter {
    /// Filter with no predicates starting at `start_index`
    pub fn empty(start_index: usize) -> Self {
        Self {
            fragments: Vec::new(),
            params: Vec::new(),
            next_index: start_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Compile one predicate against an already resolved payload key
pub fn compile_predicate(
    predicate: &Predicate,
    key: &str,
    index: usize,
) -> (CompiledFragment, QueryParam) {
    let kind = predicate.value_kind();
    let sql = format!(
        "({}->>{})::{} {} ${}{}",
        PAYLOAD_COLUMN,
        quote_literal(key),
        kind.sql_type(),
        predicate.operator.as_sql(),
        index,
        kind.param_cast()
    );
    (
        CompiledFragment {
            sql,
            placeholder: index,
        },
        predicate.value.to_param(),
    )
}

/// Compile predicates in order, assigning placeholders from `start_index`.
///
/// Fails on the first field not present in `fields`.
pub fn compile(
    predicates: &[Predicate],
    fields: &PayloadFields,
    start_index: usize,
) -> Result<CompiledFilter, FilterError> {
    let mut compiled = CompiledFilter::empty(start_index);

    for predicate in predicates {
        let key = fields
            .resolve(&predicate.field)
            .ok_or_else(|| FilterError::UnknownField(predicate.field.clone()))?;
        let (fragment, param) = compile_predicate(predicate, key, compiled.next_index);
        compiled.fragments.push(fragment);
        compiled.params.push(param);
        compiled.next_index += 1;
    }

    Ok(compiled)
}
