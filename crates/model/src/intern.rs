//! Process-wide table of the raw type names that show up in nearly every
//! class file. Looking these up before allocating saves thousands of
//! allocations over a large jar.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::TypeName;

static COMMON: Lazy<HashMap<&'static str, TypeName>> = Lazy::new(|| {
    let names = [
        "java/lang/Object",
        "java/lang/String",
        "java/lang/Boolean",
        "java/lang/Byte",
        "java/lang/Character",
        "java/lang/Double",
        "java/lang/Float",
        "java/lang/Integer",
        "java/lang/Long",
        "java/lang/Short",
        "java/lang/Void",
    ];
    names
        .into_iter()
        .map(|n| (n, TypeName::raw_uninterned(n)))
        .collect()
});

pub(crate) fn common(name: &str) -> Option<TypeName> {
    COMMON.get(name).cloned()
}
