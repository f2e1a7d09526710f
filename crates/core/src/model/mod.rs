// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative resource model

pub mod command;
mod definition;
mod field;

pub use command::{ArgSpec, CommandSet, CommandSpec, FieldOptions, OptionKind, OptionSpec};
pub use definition::{
    normalize_endpoint, Behavior, DefinitionError, ResourceBuilder, ResourceDefinition,
};
pub use field::{parse_bool, read_variables, Field, FieldType, Relation};
