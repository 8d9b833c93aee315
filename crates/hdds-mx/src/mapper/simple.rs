// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed class -> simple kind table.

use super::Converter;
use crate::error::Error;
use crate::types::{OpenValue, SimpleKind};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

fn mismatch<T: 'static>() -> Error {
    Error::InvalidValue(format!(
        "value is not a {}",
        std::any::type_name::<T>()
    ))
}

fn converter<T, F>(to_value: F) -> Converter
where
    T: 'static,
    F: Fn(&T) -> OpenValue + Send + Sync + 'static,
{
    Arc::new(move |value: &dyn Any| {
        value
            .downcast_ref::<T>()
            .map(&to_value)
            .ok_or_else(mismatch::<T>)
    })
}

/// Converter for integers stored in a narrower kind; out-of-range values fail.
fn narrowing<T, N, F>(wrap: F) -> Converter
where
    T: Copy + fmt::Display + 'static,
    N: TryFrom<T>,
    F: Fn(N) -> OpenValue + Send + Sync + 'static,
{
    Arc::new(move |value: &dyn Any| -> crate::error::Result<OpenValue> {
        let v = *value.downcast_ref::<T>().ok_or_else(mismatch::<T>)?;
        N::try_from(v).map(&wrap).map_err(|_| {
            Error::InvalidValue(format!(
                "{} {} is out of range for {}",
                std::any::type_name::<T>(),
                v,
                std::any::type_name::<N>()
            ))
        })
    })
}

macro_rules! simple_entry {
    ($table:expr, $ty:ty, $kind:ident, $variant:ident) => {
        $table.insert(
            TypeId::of::<$ty>(),
            (
                SimpleKind::$kind,
                converter::<$ty, _>(|v| OpenValue::$variant(*v)),
            ),
        );
    };
}

/// The 1:1 table of scalar classes.
pub(super) fn simple_table() -> HashMap<TypeId, (SimpleKind, Converter)> {
    let mut table: HashMap<TypeId, (SimpleKind, Converter)> = HashMap::new();

    table.insert(
        TypeId::of::<()>(),
        (SimpleKind::Void, converter::<(), _>(|_| OpenValue::Void)),
    );
    simple_entry!(table, bool, Bool, Bool);
    simple_entry!(table, char, Char, Char);
    simple_entry!(table, i8, I8, I8);
    simple_entry!(table, i16, I16, I16);
    simple_entry!(table, i32, I32, I32);
    simple_entry!(table, i64, I64, I64);
    simple_entry!(table, u8, U8, U8);
    simple_entry!(table, u16, U16, U16);
    simple_entry!(table, u32, U32, U32);
    simple_entry!(table, u64, U64, U64);
    simple_entry!(table, f32, F32, F32);
    simple_entry!(table, f64, F64, F64);
    simple_entry!(table, SystemTime, Date, Date);

    // No wider kinds on the wire: pointer-sized and 128-bit integers are
    // carried as 64-bit values.
    table.insert(
        TypeId::of::<usize>(),
        (SimpleKind::U64, narrowing::<usize, u64, _>(OpenValue::U64)),
    );
    table.insert(
        TypeId::of::<isize>(),
        (SimpleKind::I64, narrowing::<isize, i64, _>(OpenValue::I64)),
    );
    table.insert(
        TypeId::of::<u128>(),
        (SimpleKind::U64, narrowing::<u128, u64, _>(OpenValue::U64)),
    );
    table.insert(
        TypeId::of::<i128>(),
        (SimpleKind::I64, narrowing::<i128, i64, _>(OpenValue::I64)),
    );

    table.insert(
        TypeId::of::<String>(),
        (
            SimpleKind::String,
            converter::<String, _>(|v| OpenValue::String(v.clone())),
        ),
    );
    table.insert(
        TypeId::of::<&'static str>(),
        (
            SimpleKind::String,
            converter::<&'static str, _>(|v| OpenValue::String((*v).to_string())),
        ),
    );
    table.insert(
        TypeId::of::<Box<str>>(),
        (
            SimpleKind::String,
            converter::<Box<str>, _>(|v| OpenValue::String(v.to_string())),
        ),
    );
    table.insert(
        TypeId::of::<Arc<str>>(),
        (
            SimpleKind::String,
            converter::<Arc<str>, _>(|v| OpenValue::String(v.to_string())),
        ),
    );

    table
}
