//! Fixed-layout schema descriptions for program accounts and instruction arguments.
//!
//! Borsh does the byte work; these tables state the wire shape (field order and width) in one
//! place so decoders can validate buffer lengths and tests can pin field offsets.

/// Wire type of a single field. Widths follow Borsh: integers little-endian, `bool` one byte,
/// strings a `u32` length prefix followed by UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U64,
    Bool,
    Pubkey,
    String,
}

impl FieldKind {
    /// Encoded width, or `None` for variable-length fields.
    pub const fn width(self) -> Option<usize> {
        match self {
            FieldKind::U64 => Some(8),
            FieldKind::Bool => Some(1),
            FieldKind::Pubkey => Some(32),
            FieldKind::String => None,
        }
    }

    /// Smallest possible encoding (an empty string is just its length prefix).
    pub const fn min_width(self) -> usize {
        match self.width() {
            Some(width) => width,
            None => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Ordered field list of one account or argument struct. No padding between fields.
#[derive(Debug, Clone, Copy)]
pub struct AccountLayout {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl AccountLayout {
    /// Minimum number of bytes a valid encoding occupies.
    pub fn min_len(&self) -> usize {
        self.fields.iter().map(|f| f.kind.min_width()).sum()
    }

    /// Exact size, if every field is fixed-width.
    pub fn fixed_len(&self) -> Option<usize> {
        self.fields.iter().map(|f| f.kind.width()).sum()
    }

    /// Byte offset of `name`, if it and every field before it are fixed-width.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        let mut offset = 0;
        for field in self.fields {
            if field.name == name {
                return Some(offset);
            }
            offset += field.kind.width()?;
        }
        None
    }
}

/// `Global` account of the pump program, discriminator included.
pub const GLOBAL_ACCOUNT_LAYOUT: AccountLayout = AccountLayout {
    name: "global",
    fields: &[
        FieldSpec::new("discriminator", FieldKind::U64),
        FieldSpec::new("initialized", FieldKind::Bool),
        FieldSpec::new("authority", FieldKind::Pubkey),
        FieldSpec::new("fee_recipient", FieldKind::Pubkey),
        FieldSpec::new("initial_virtual_token_reserves", FieldKind::U64),
        FieldSpec::new("initial_virtual_sol_reserves", FieldKind::U64),
        FieldSpec::new("initial_real_token_reserves", FieldKind::U64),
        FieldSpec::new("token_total_supply", FieldKind::U64),
        FieldSpec::new("fee_basis_points", FieldKind::U64),
    ],
};

/// Arguments of the `create` instruction, after the 8-byte discriminator.
pub const CREATE_ARGS_LAYOUT: AccountLayout = AccountLayout {
    name: "create",
    fields: &[
        FieldSpec::new("name", FieldKind::String),
        FieldSpec::new("symbol", FieldKind::String),
        FieldSpec::new("uri", FieldKind::String),
        FieldSpec::new("creator", FieldKind::Pubkey),
    ],
};

/// Arguments of the `buy` instruction, after the 8-byte discriminator.
pub const BUY_ARGS_LAYOUT: AccountLayout = AccountLayout {
    name: "buy",
    fields: &[
        FieldSpec::new("amount", FieldKind::U64),
        FieldSpec::new("max_sol_cost", FieldKind::U64),
    ],
};
