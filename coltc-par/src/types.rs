//! Type handles, the type buffer, and operator-support queries (§3.3).

use coltc_util::index_vec::Idx;
use coltc_util::{define_idx, IndexVec};

define_idx!(pub struct TypeToken);

/// The built-in scalar families the language defines directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Byte,
    Word,
    Dword,
    Qword,
    Void,
}

impl BuiltinType {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BuiltinType::I8
                | BuiltinType::I16
                | BuiltinType::I32
                | BuiltinType::I64
                | BuiltinType::U8
                | BuiltinType::U16
                | BuiltinType::U32
                | BuiltinType::U64
        )
    }

    pub fn is_signed(self) -> bool {
        matches!(self, BuiltinType::I8 | BuiltinType::I16 | BuiltinType::I32 | BuiltinType::I64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, BuiltinType::F32 | BuiltinType::F64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// The raw-storage "byte-family" types, the only legal endpoints of a
    /// `bit_as` cast.
    pub fn is_byte_family(self) -> bool {
        matches!(self, BuiltinType::Byte | BuiltinType::Word | BuiltinType::Dword | BuiltinType::Qword)
    }

    pub fn bit_width(self) -> u32 {
        match self {
            BuiltinType::Bool | BuiltinType::I8 | BuiltinType::U8 | BuiltinType::Byte => 8,
            BuiltinType::I16 | BuiltinType::U16 | BuiltinType::Word => 16,
            BuiltinType::I32 | BuiltinType::U32 | BuiltinType::F32 | BuiltinType::Dword | BuiltinType::Char => 32,
            BuiltinType::I64 | BuiltinType::U64 | BuiltinType::F64 | BuiltinType::Qword => 64,
            BuiltinType::Void => 0,
        }
    }
}

/// The kind of a type-buffer entry (§3.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeVariant {
    Builtin(BuiltinType),
    Pointer { pointee: TypeToken, mutable: bool },
    OpaquePointer { mutable: bool },
    Error,
}

impl TypeVariant {
    pub fn is_pointer(self) -> bool {
        matches!(self, TypeVariant::Pointer { .. } | TypeVariant::OpaquePointer { .. })
    }

    pub fn is_opaque_pointer(self) -> bool {
        matches!(self, TypeVariant::OpaquePointer { .. })
    }

    pub fn is_mutable_pointer(self) -> bool {
        matches!(
            self,
            TypeVariant::Pointer { mutable: true, .. } | TypeVariant::OpaquePointer { mutable: true }
        )
    }

    pub fn is_error(self) -> bool {
        matches!(self, TypeVariant::Error)
    }

    pub fn as_builtin(self) -> Option<BuiltinType> {
        match self {
            TypeVariant::Builtin(b) => Some(b),
            _ => None,
        }
    }
}

/// Outcome of querying whether a unary operator applies to a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnarySupport {
    Builtin,
    Invalid,
}

/// Outcome of querying whether a binary operator applies between two types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinarySupport {
    Builtin,
    InvalidOp,
    InvalidType,
}

/// Outcome of querying whether a cast between two types is legal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastSupport {
    Builtin,
    Invalid,
}

/// The unary operator kinds the type system reasons about (§4.4.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    Deref,
    AddressOf,
}

/// The binary operator kinds the type system reasons about (§4.4.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    And,
    Or,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq
        )
    }

    pub fn is_bitwise(self) -> bool {
        matches!(
            self,
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor | BinaryOp::Shl | BinaryOp::Shr
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Interns type variants and answers the operator-support queries the AST
/// builder needs (§3.3). A single buffer is shared by every unit in a
/// compilation session; mutation is serialized by whatever owns it (see
/// the base spec's §5 and `coltc-drv::Session`).
pub struct TypeBuffer {
    variants: IndexVec<TypeToken, TypeVariant>,
    by_variant: rustc_hash::FxHashMap<TypeVariant, TypeToken>,
    error_type: TypeToken,
}

impl TypeBuffer {
    pub fn new() -> Self {
        let mut variants = IndexVec::new();
        let mut by_variant = rustc_hash::FxHashMap::default();
        let error_type = variants.push(TypeVariant::Error);
        by_variant.insert(TypeVariant::Error, error_type);

        let mut buffer = TypeBuffer { variants, by_variant, error_type };
        for builtin in [
            BuiltinType::Bool,
            BuiltinType::Char,
            BuiltinType::I8,
            BuiltinType::I16,
            BuiltinType::I32,
            BuiltinType::I64,
            BuiltinType::U8,
            BuiltinType::U16,
            BuiltinType::U32,
            BuiltinType::U64,
            BuiltinType::F32,
            BuiltinType::F64,
            BuiltinType::Byte,
            BuiltinType::Word,
            BuiltinType::Dword,
            BuiltinType::Qword,
            BuiltinType::Void,
        ] {
            buffer.intern(TypeVariant::Builtin(builtin));
        }
        buffer
    }

    /// Interns `variant`, returning the existing handle if already present
    /// (one of this session's "internal mutation points", §9).
    pub fn intern(&mut self, variant: TypeVariant) -> TypeToken {
        if let Some(&existing) = self.by_variant.get(&variant) {
            return existing;
        }
        let token = self.variants.push(variant);
        self.by_variant.insert(variant, token);
        token
    }

    pub fn intern_builtin(&mut self, builtin: BuiltinType) -> TypeToken {
        self.intern(TypeVariant::Builtin(builtin))
    }

    pub fn intern_pointer(&mut self, pointee: TypeToken, mutable: bool) -> TypeToken {
        self.intern(TypeVariant::Pointer { pointee, mutable })
    }

    pub fn intern_opaque_pointer(&mut self, mutable: bool) -> TypeToken {
        self.intern(TypeVariant::OpaquePointer { mutable })
    }

    pub fn error_type(&self) -> TypeToken {
        self.error_type
    }

    pub fn get(&self, token: TypeToken) -> TypeVariant {
        self.variants.get(token).copied().unwrap_or(TypeVariant::Error)
    }

    pub fn supports_unary(&self, token: TypeToken, op: UnaryOp) -> UnarySupport {
        let variant = self.get(token);
        if variant.is_error() {
            return UnarySupport::Invalid;
        }
        match op {
            UnaryOp::Neg => match variant.as_builtin() {
                Some(b) if b.is_signed() || b.is_float() => UnarySupport::Builtin,
                _ => UnarySupport::Invalid,
            },
            UnaryOp::Not => match variant.as_builtin() {
                Some(BuiltinType::Bool) => UnarySupport::Builtin,
                _ => UnarySupport::Invalid,
            },
            UnaryOp::BitNot => match variant.as_builtin() {
                Some(b) if b.is_integer() || b.is_byte_family() => UnarySupport::Builtin,
                _ => UnarySupport::Invalid,
            },
            UnaryOp::Deref => {
                if variant.is_opaque_pointer() {
                    UnarySupport::Invalid
                } else if variant.is_pointer() {
                    UnarySupport::Builtin
                } else {
                    UnarySupport::Invalid
                }
            }
            // Grammar-restricted to variable reads; the type system itself
            // always accepts it once the builder has checked the operand
            // shape (see `add_address_of`).
            UnaryOp::AddressOf => UnarySupport::Builtin,
        }
    }

    pub fn supports_binary(&self, token: TypeToken, op: BinaryOp, other: TypeToken) -> BinarySupport {
        let lhs = self.get(token);
        let rhs = self.get(other);
        if lhs.is_error() || rhs.is_error() {
            return BinarySupport::InvalidType;
        }

        if lhs.is_pointer() {
            return match op {
                BinaryOp::Eq | BinaryOp::NotEq => {
                    if rhs.is_pointer() && lhs == rhs {
                        BinarySupport::Builtin
                    } else if rhs.is_pointer() {
                        BinarySupport::InvalidType
                    } else {
                        BinarySupport::InvalidType
                    }
                }
                _ => BinarySupport::InvalidOp,
            };
        }

        let Some(lb) = lhs.as_builtin() else { return BinarySupport::InvalidOp };

        if op.is_logical() {
            return if lb == BuiltinType::Bool {
                match rhs.as_builtin() {
                    Some(BuiltinType::Bool) => BinarySupport::Builtin,
                    Some(_) => BinarySupport::InvalidType,
                    None => BinarySupport::InvalidType,
                }
            } else {
                BinarySupport::InvalidOp
            };
        }

        if op.is_comparison() {
            let comparable = lb.is_numeric() || lb == BuiltinType::Char || lb == BuiltinType::Bool;
            if !comparable {
                return BinarySupport::InvalidOp;
            }
            return match rhs.as_builtin() {
                Some(rb) if rb == lb => BinarySupport::Builtin,
                Some(_) => BinarySupport::InvalidType,
                None => BinarySupport::InvalidType,
            };
        }

        if op.is_bitwise() {
            if !(lb.is_integer() || lb.is_byte_family()) {
                return BinarySupport::InvalidOp;
            }
            return match rhs.as_builtin() {
                Some(rb) if rb == lb => BinarySupport::Builtin,
                Some(_) => BinarySupport::InvalidType,
                None => BinarySupport::InvalidType,
            };
        }

        // Arithmetic.
        if !lb.is_numeric() {
            return BinarySupport::InvalidOp;
        }
        match rhs.as_builtin() {
            Some(rb) if rb == lb => BinarySupport::Builtin,
            Some(_) => BinarySupport::InvalidType,
            None => BinarySupport::InvalidType,
        }
    }

    pub fn castable_to(&self, token: TypeToken, other: TypeToken) -> CastSupport {
        let from = self.get(token);
        let to = self.get(other);
        if from.is_error() || to.is_error() {
            return CastSupport::Invalid;
        }
        match (from.as_builtin(), to.as_builtin()) {
            (Some(_), Some(_)) => CastSupport::Builtin,
            _ => {
                if from.is_pointer() && to.is_pointer() {
                    CastSupport::Builtin
                } else {
                    CastSupport::Invalid
                }
            }
        }
    }

    /// `bit_as` additionally requires one endpoint to be a byte-family type.
    pub fn bit_castable_to(&self, token: TypeToken, other: TypeToken) -> CastSupport {
        let from = self.get(token).as_builtin();
        let to = self.get(other).as_builtin();
        match (from, to) {
            (Some(a), Some(b)) if a.is_byte_family() || b.is_byte_family() => CastSupport::Builtin,
            _ => CastSupport::Invalid,
        }
    }
}

impl Default for TypeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_builtin_twice_returns_same_handle() {
        let mut types = TypeBuffer::new();
        let a = types.intern_builtin(BuiltinType::I32);
        let b = types.intern_builtin(BuiltinType::I32);
        assert_eq!(a, b);
    }

    #[test]
    fn matching_numeric_types_support_arithmetic() {
        let mut types = TypeBuffer::new();
        let i32_ty = types.intern_builtin(BuiltinType::I32);
        assert_eq!(types.supports_binary(i32_ty, BinaryOp::Add, i32_ty), BinarySupport::Builtin);
    }

    #[test]
    fn mismatched_numeric_types_are_invalid_type() {
        let mut types = TypeBuffer::new();
        let i32_ty = types.intern_builtin(BuiltinType::I32);
        let f64_ty = types.intern_builtin(BuiltinType::F64);
        assert_eq!(types.supports_binary(i32_ty, BinaryOp::Add, f64_ty), BinarySupport::InvalidType);
    }

    #[test]
    fn bool_does_not_support_arithmetic() {
        let mut types = TypeBuffer::new();
        let bool_ty = types.intern_builtin(BuiltinType::Bool);
        assert_eq!(types.supports_binary(bool_ty, BinaryOp::Add, bool_ty), BinarySupport::InvalidOp);
    }

    #[test]
    fn opaque_pointer_deref_is_invalid() {
        let mut types = TypeBuffer::new();
        let opaque = types.intern_opaque_pointer(false);
        assert_eq!(types.supports_unary(opaque, UnaryOp::Deref), UnarySupport::Invalid);
    }

    #[test]
    fn non_opaque_pointer_deref_is_builtin() {
        let mut types = TypeBuffer::new();
        let i32_ty = types.intern_builtin(BuiltinType::I32);
        let ptr = types.intern_pointer(i32_ty, false);
        assert_eq!(types.supports_unary(ptr, UnaryOp::Deref), UnarySupport::Builtin);
    }

    #[test]
    fn negation_requires_signed_or_float() {
        let mut types = TypeBuffer::new();
        let i32_ty = types.intern_builtin(BuiltinType::I32);
        let u32_ty = types.intern_builtin(BuiltinType::U32);
        assert_eq!(types.supports_unary(i32_ty, UnaryOp::Neg), UnarySupport::Builtin);
        assert_eq!(types.supports_unary(u32_ty, UnaryOp::Neg), UnarySupport::Invalid);
    }
}
