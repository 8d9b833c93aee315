// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Invokable operation info.

use super::{derived_descriptor, OperationMetadata, ParameterInfo};
use crate::descriptor::{Descriptor, DescriptorBuilder};
use crate::error::{BoxError, Error, Result};
use crate::mapper::OpenTypeMapper;
use crate::types::{Class, OpenType, OpenValue, SimpleKind, TypeClass};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

const BUILDER: &str = "OperationInfo";

type Invoker = Box<dyn Fn(&[OpenValue]) -> std::result::Result<OpenValue, BoxError> + Send + Sync>;

/// What invoking an operation does to the managed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Impact {
    /// Read-like, no state change.
    Info,
    /// Changes state, returns nothing meaningful.
    Action,
    /// Changes state and returns information.
    ActionInfo,
    #[default]
    Unknown,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Impact::Info => "INFO",
            Impact::Action => "ACTION",
            Impact::ActionInfo => "ACTION_INFO",
            Impact::Unknown => "UNKNOWN",
        })
    }
}

enum Return {
    Class(Class),
    Type(OpenType),
}

/// Named operation: parameters, return type and the function that runs it.
pub struct OperationInfo {
    name: String,
    description: Option<String>,
    parameters: Vec<ParameterInfo>,
    return_type: OpenType,
    impact: Impact,
    descriptor: Descriptor,
    invoker: Invoker,
    check_return_values: bool,
    metadata: OperationMetadata,
}

impl OperationInfo {
    /// Start a builder; a name and an invoker are required.
    pub fn builder() -> OperationInfoBuilder {
        OperationInfoBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// Open type of the result, `void` when unset.
    pub fn return_type(&self) -> &OpenType {
        &self.return_type
    }

    pub fn impact(&self) -> Impact {
        self.impact
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Metadata view, computed at build.
    pub fn metadata(&self) -> &OperationMetadata {
        &self.metadata
    }

    /// Check `args` against the signature, then run the invoker.
    ///
    /// Arity or type mismatches fail before the invoker is called.
    pub fn invoke(&self, args: &[OpenValue]) -> Result<OpenValue> {
        self.check_arguments(args)?;

        let result = (self.invoker)(args).map_err(|source| Error::Invocation {
            operation: self.name.clone(),
            source,
        })?;

        if self.check_return_values && !self.return_type.is_value(&result) {
            return Err(Error::InvalidValue(format!(
                "operation '{}' returned {} but declares {}",
                self.name, result, self.return_type
            )));
        }
        Ok(result)
    }

    fn check_arguments(&self, args: &[OpenValue]) -> Result<()> {
        if args.len() != self.parameters.len() {
            return Err(Error::InvalidOperationArguments {
                operation: self.name.clone(),
                reason: format!(
                    "expected {} arguments, got {}",
                    self.parameters.len(),
                    args.len()
                ),
            });
        }
        for (position, (parameter, arg)) in self.parameters.iter().zip(args).enumerate() {
            if !parameter.open_type().is_value(arg) {
                return Err(Error::InvalidOperationArguments {
                    operation: self.name.clone(),
                    reason: format!(
                        "argument {} ('{}') expects {}, got {}",
                        position,
                        parameter.name(),
                        parameter.open_type(),
                        arg
                    ),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for OperationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationInfo")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .field("impact", &self.impact)
            .finish_non_exhaustive()
    }
}

/// Builder for [`OperationInfo`].
#[derive(Default)]
pub struct OperationInfoBuilder {
    name: Option<String>,
    description: Option<String>,
    parameters: Vec<ParameterInfo>,
    returns: Option<Return>,
    impact: Impact,
    descriptor: DescriptorBuilder,
    invoker: Option<Invoker>,
    mapper: Option<Arc<OpenTypeMapper>>,
}

impl OperationInfoBuilder {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a parameter. Order is the call signature.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterInfo) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Declare the return class; resolved through the mapper at build.
    #[must_use]
    pub fn with_return<R: TypeClass>(mut self) -> Self {
        self.returns = Some(Return::Class(R::class()));
        self
    }

    /// Declare the return open type directly.
    #[must_use]
    pub fn with_return_type(mut self, open_type: OpenType) -> Self {
        self.returns = Some(Return::Type(open_type));
        self
    }

    #[must_use]
    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    #[must_use]
    pub fn with_descriptor(mut self, descriptor: &Descriptor) -> Self {
        self.descriptor = self.descriptor.with_descriptor(descriptor);
        self
    }

    #[must_use]
    pub fn with_invoker<E, F>(mut self, invoker: F) -> Self
    where
        E: Into<BoxError>,
        F: Fn(&[OpenValue]) -> std::result::Result<OpenValue, E> + Send + Sync + 'static,
    {
        self.invoker = Some(Box::new(move |args: &[OpenValue]| {
            invoker(args).map_err(Into::<BoxError>::into)
        }));
        self
    }

    #[must_use]
    pub fn with_mapper(mut self, mapper: Arc<OpenTypeMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Check parameter names and resolve the return type.
    pub fn build(self) -> Result<OperationInfo> {
        let name = self.name.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "name",
        })?;
        if name.is_empty() {
            return Err(Error::InvalidConfig("operation name must not be empty".into()));
        }
        let invoker = self.invoker.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "invoker",
        })?;

        let mut seen = HashSet::with_capacity(self.parameters.len());
        for parameter in &self.parameters {
            if !seen.insert(parameter.name()) {
                return Err(Error::DuplicateMember {
                    owner: format!("operation '{}'", name),
                    name: parameter.name().to_string(),
                });
            }
        }

        let mapper = self.mapper.unwrap_or_else(OpenTypeMapper::global);
        let settings = mapper.settings();
        let (return_type, return_class) = match self.returns {
            Some(Return::Class(class)) => (mapper.map(&class)?, Some(class)),
            Some(Return::Type(open_type)) => (open_type, None),
            None => (OpenType::Simple(SimpleKind::Void), Some(<()>::class())),
        };
        let descriptor = derived_descriptor(
            &return_type,
            return_class.as_ref(),
            settings.qualified_type_names,
            &self.descriptor,
        );

        let metadata = OperationMetadata {
            name: name.clone(),
            description: self.description.clone(),
            parameters: self
                .parameters
                .iter()
                .map(|parameter| parameter.metadata().clone())
                .collect(),
            return_type: return_type.class_name(),
            impact: self.impact,
            descriptor: descriptor.clone(),
        };

        Ok(OperationInfo {
            name,
            description: self.description,
            parameters: self.parameters,
            return_type,
            impact: self.impact,
            descriptor,
            invoker,
            check_return_values: settings.check_return_values,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn mapper() -> Arc<OpenTypeMapper> {
        Arc::new(OpenTypeMapper::new())
    }

    fn int_param(name: &str, mapper: &Arc<OpenTypeMapper>) -> ParameterInfo {
        ParameterInfo::builder()
            .with_class::<i32>()
            .with_name(name)
            .with_mapper(Arc::clone(mapper))
            .build()
            .expect("parameter")
    }

    fn add(mapper: &Arc<OpenTypeMapper>) -> OperationInfo {
        OperationInfo::builder()
            .with_name("add")
            .with_parameter(int_param("a", mapper))
            .with_parameter(int_param("b", mapper))
            .with_return::<i32>()
            .with_impact(Impact::Info)
            .with_invoker(|args: &[OpenValue]| {
                let a = args[0].as_i32().ok_or("a")?;
                let b = args[1].as_i32().ok_or("b")?;
                Ok::<_, BoxError>(OpenValue::I32(a + b))
            })
            .with_mapper(Arc::clone(mapper))
            .build()
            .expect("operation")
    }

    #[test]
    fn test_invoke() {
        let mapper = mapper();
        let op = add(&mapper);
        let result = op
            .invoke(&[OpenValue::I32(2), OpenValue::I32(3)])
            .expect("invoke");
        assert_eq!(result, OpenValue::I32(5));

        let meta = op.metadata();
        assert_eq!(meta.return_type, "i32");
        assert_eq!(meta.impact, Impact::Info);
        assert_eq!(meta.parameters.len(), 2);
    }

    #[test]
    fn test_argument_checks() {
        let mapper = mapper();
        let op = add(&mapper);

        let err = op.invoke(&[OpenValue::I32(2)]).unwrap_err();
        assert!(matches!(err, Error::InvalidOperationArguments { .. }));

        let err = op
            .invoke(&[OpenValue::I32(2), OpenValue::String("3".into())])
            .unwrap_err();
        match err {
            Error::InvalidOperationArguments { operation, reason } => {
                assert_eq!(operation, "add");
                assert!(reason.contains("'b'"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_return_is_void() {
        let op = OperationInfo::builder()
            .with_name("reset")
            .with_impact(Impact::Action)
            .with_invoker(|_: &[OpenValue]| Ok::<_, BoxError>(OpenValue::Void))
            .with_mapper(mapper())
            .build()
            .expect("operation");
        assert_eq!(op.return_type(), &OpenType::Simple(SimpleKind::Void));
        assert_eq!(op.metadata().return_type, "()");
        assert_eq!(op.invoke(&[]).expect("invoke"), OpenValue::Void);
    }

    #[test]
    fn test_return_value_checked() {
        let op = OperationInfo::builder()
            .with_name("liar")
            .with_return::<String>()
            .with_invoker(|_: &[OpenValue]| Ok::<_, BoxError>(OpenValue::I64(1)))
            .with_mapper(mapper())
            .build()
            .expect("operation");
        assert!(matches!(op.invoke(&[]), Err(Error::InvalidValue(_))));

        let relaxed = Arc::new(OpenTypeMapper::with_settings(
            Settings::default().with_check_return_values(false),
        ));
        let op = OperationInfo::builder()
            .with_name("liar")
            .with_return::<String>()
            .with_invoker(|_: &[OpenValue]| Ok::<_, BoxError>(OpenValue::I64(1)))
            .with_mapper(relaxed)
            .build()
            .expect("operation");
        assert_eq!(op.invoke(&[]).expect("unchecked"), OpenValue::I64(1));
    }

    #[test]
    fn test_invoker_failure() {
        let op = OperationInfo::builder()
            .with_name("fail")
            .with_invoker(|_: &[OpenValue]| Err::<OpenValue, _>("disk full"))
            .with_mapper(mapper())
            .build()
            .expect("operation");
        match op.invoke(&[]).unwrap_err() {
            Error::Invocation { operation, source } => {
                assert_eq!(operation, "fail");
                assert_eq!(source.to_string(), "disk full");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_errors() {
        let mapper = mapper();
        let err = OperationInfo::builder()
            .with_name("noop")
            .with_mapper(Arc::clone(&mapper))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "invoker", .. }));

        let err = OperationInfo::builder()
            .with_name("dup")
            .with_parameter(int_param("a", &mapper))
            .with_parameter(int_param("a", &mapper))
            .with_invoker(|_: &[OpenValue]| Ok::<_, BoxError>(OpenValue::Void))
            .with_mapper(mapper)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateMember { ref name, .. } if name == "a"));
    }
}
