//! A single instruction inside a transaction.

use num_bigint::BigUint;
use std::fmt;

use super::types::TokenType;
use crate::codec::rlp::{write_biguint, write_bytes, write_list, write_optional};
use crate::codec::{CodecError, Decode, Decoder, Encode};
use crate::config::ADDRESS_LENGTH;
use crate::types::Address;

/// Recipient, amount, token, and payload of one step of a transaction.
///
/// `to == None` means no recipient, as in contract creation. A clause is
/// immutable: the `with_*` methods return a modified copy and leave the
/// receiver untouched. Accessors hand out shared borrows, so nothing
/// reachable from a clause can be changed once it has been built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    to: Option<Address>,
    value: BigUint,
    token: TokenType,
    data: Vec<u8>,
}

impl Clause {
    /// A clause to `to` with zero value, the MTR token, and no data.
    pub fn new(to: Option<Address>) -> Self {
        Self {
            to,
            ..Self::default()
        }
    }

    pub fn with_value(&self, value: BigUint) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    pub fn with_token(&self, token: TokenType) -> Self {
        Self {
            token,
            ..self.clone()
        }
    }

    pub fn with_data(&self, data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            ..self.clone()
        }
    }

    pub fn to(&self) -> Option<Address> {
        self.to
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn token(&self) -> TokenType {
        self.token
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Canonical encoding of this clause alone.
    pub fn encode(&self) -> Vec<u8> {
        self.to_rlp()
    }

    /// Decodes a clause from a complete buffer.
    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        Self::from_rlp(data)
    }
}

impl Encode for Clause {
    fn encode_to(&self, out: &mut Vec<u8>) {
        write_list(out, |payload| {
            write_optional(payload, self.to.as_ref().map(|to| &to.as_bytes()[..]));
            write_biguint(payload, &self.value);
            self.token.encode_to(payload);
            write_bytes(payload, &self.data);
        });
    }
}

impl Decode for Clause {
    fn decode_from(decoder: &mut Decoder<'_>) -> Result<Self, CodecError> {
        let mut fields = decoder.list()?;
        let to = fields
            .optional_fixed::<ADDRESS_LENGTH>()?
            .map(Address::new);
        let value = fields.biguint()?;
        let token = TokenType::decode_from(&mut fields)?;
        let data = fields.bytes()?.to_vec();
        fields.finish()?;
        Ok(Self {
            to,
            value,
            token,
            data,
        })
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let to = match &self.to {
            Some(address) => address.to_string(),
            None => "nil".to_string(),
        };
        write!(
            f,
            "Clause(\n\t\tTo:\t{to}\n\t\tValue:\t{}\n\t\tToken:\t{}\n\t\tData:\t0x{})",
            self.value,
            self.token,
            hex::encode(&self.data)
        )
    }
}
