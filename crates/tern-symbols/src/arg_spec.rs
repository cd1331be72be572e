//! Packed argument specification of a built-in symbol.
//!
//! Layout (16 bits):
//! - 0-2: return type
//! - 3: receiver (`this`) is passed
//! - 4-5: call kind
//! - 6-14: up to three parameter types, 3 bits each, `Void` terminates
//! - 15: reserved

use std::fmt;

use crate::constants::MAX_PARAMS;

const TYPE_BITS: u16 = 3;
const TYPE_MASK: u16 = (1 << TYPE_BITS) - 1;
const THIS_BIT: u16 = 1 << 3;
const CALL_SHIFT: u16 = 4;
const CALL_MASK: u16 = 0b11 << CALL_SHIFT;
const PARAMS_SHIFT: u16 = 6;
const RESERVED_BIT: u16 = 1 << 15;

const _: () = assert!(PARAMS_SHIFT + TYPE_BITS * MAX_PARAMS as u16 <= 15);

/// Marshalled type of a parameter or return value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ArgType {
    Void = 0,
    /// Passed through untouched.
    JsVar = 1,
    /// Remaining arguments packed into an array.
    ArgumentArray = 2,
    Bool = 3,
    Int32 = 4,
    Pin = 5,
    Float = 6,
}

impl ArgType {
    pub fn from_bits(bits: u16) -> Option<Self> {
        Some(match bits {
            0 => ArgType::Void,
            1 => ArgType::JsVar,
            2 => ArgType::ArgumentArray,
            3 => ArgType::Bool,
            4 => ArgType::Int32,
            5 => ArgType::Pin,
            6 => ArgType::Float,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            ArgType::Void => "void",
            ArgType::JsVar => "jsvar",
            ArgType::ArgumentArray => "args",
            ArgType::Bool => "bool",
            ArgType::Int32 => "int32",
            ArgType::Pin => "pin",
            ArgType::Float => "float",
        }
    }
}

/// How a resolved symbol turns into a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Materialize a callable native function.
    Function,
    /// Call right away; the member's value is the call's result.
    ExecuteImmediately,
    /// The member is a native object backed by another symbol table.
    SymbolTable,
}

/// Packed argument spec, stored verbatim in each symbol entry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct ArgSpec(u16);

impl ArgSpec {
    /// Spec of a member that is itself a symbol table.
    pub const SYMBOL_TABLE: Self = Self(2 << CALL_SHIFT | ArgType::JsVar as u16);

    pub const fn new(returns: ArgType) -> Self {
        Self(returns as u16)
    }

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn with_this(self) -> Self {
        Self(self.0 | THIS_BIT)
    }

    pub const fn immediate(self) -> Self {
        Self((self.0 & !CALL_MASK) | 1 << CALL_SHIFT)
    }

    /// Append a parameter, or `None` when all slots are taken or `ty` is `Void`.
    pub const fn try_param(self, ty: ArgType) -> Option<Self> {
        if matches!(ty, ArgType::Void) {
            return None;
        }
        let mut slot = 0;
        while slot < MAX_PARAMS as u16 {
            let shift = PARAMS_SHIFT + slot * TYPE_BITS;
            if (self.0 >> shift) & TYPE_MASK == 0 {
                return Some(Self(self.0 | (ty as u16) << shift));
            }
            slot += 1;
        }
        None
    }

    /// Append a parameter. Panics when the signature is already full, which
    /// in a `const` context is a compile error.
    pub const fn param(self, ty: ArgType) -> Self {
        match self.try_param(ty) {
            Some(spec) => spec,
            None => panic!("argument spec holds at most 3 parameters"),
        }
    }

    pub fn return_type(self) -> ArgType {
        ArgType::from_bits(self.0 & TYPE_MASK).unwrap_or(ArgType::Void)
    }

    pub fn has_this(self) -> bool {
        self.0 & THIS_BIT != 0
    }

    pub fn call_kind(self) -> CallKind {
        match (self.0 & CALL_MASK) >> CALL_SHIFT {
            1 => CallKind::ExecuteImmediately,
            2 => CallKind::SymbolTable,
            _ => CallKind::Function,
        }
    }

    /// Declared parameter types, in order.
    pub fn params(self) -> impl Iterator<Item = ArgType> {
        (0..MAX_PARAMS as u16)
            .map(move |slot| (self.0 >> (PARAMS_SHIFT + slot * TYPE_BITS)) & TYPE_MASK)
            .map_while(|bits| match ArgType::from_bits(bits) {
                Some(ArgType::Void) | None => None,
                Some(ty) => Some(ty),
            })
    }

    pub fn param_count(self) -> usize {
        self.params().count()
    }

    /// Reserved bits are clear and every field decodes.
    pub fn is_well_formed(self) -> bool {
        if self.0 & RESERVED_BIT != 0 || (self.0 & CALL_MASK) >> CALL_SHIFT == 3 {
            return false;
        }
        let fields = (0..MAX_PARAMS as u16)
            .map(|slot| (self.0 >> (PARAMS_SHIFT + slot * TYPE_BITS)) & TYPE_MASK)
            .chain(std::iter::once(self.0 & TYPE_MASK));
        let mut seen_void = false;
        for (i, bits) in fields.enumerate() {
            if ArgType::from_bits(bits).is_none() {
                return false;
            }
            // A gap followed by another parameter would hide that parameter.
            if i < MAX_PARAMS {
                if bits == 0 {
                    seen_void = true;
                } else if seen_void {
                    return false;
                }
            }
        }
        true
    }
}

impl fmt::Debug for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgSpec({:#06x}: {})", self.0, self)
    }
}

impl fmt::Display for ArgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.call_kind() == CallKind::SymbolTable {
            return f.write_str("table");
        }
        f.write_str("(")?;
        let mut first = true;
        if self.has_this() {
            f.write_str("this")?;
            first = false;
        }
        for ty in self.params() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(ty.name())?;
            first = false;
        }
        write!(f, ") -> {}", self.return_type().name())?;
        if self.call_kind() == CallKind::ExecuteImmediately {
            f.write_str(" !")?;
        }
        Ok(())
    }
}
