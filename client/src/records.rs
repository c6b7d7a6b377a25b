//! Fixed-layout account records owned by the greeting program
//!
//! Field order in each struct is the wire layout: Borsh encodes the fields in
//! declaration order as little-endian fixed-width integers, so the serialized
//! size is known from the schema alone. The space reserved when an account is
//! created must equal the record's encoded size exactly.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::SessionError;

/// State written by the greeting instruction: two inputs and their sum.
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GreetingRecord {
    pub input_a: u32,
    pub input_b: u32,
    pub sum: u32,
}

/// Auxiliary state account, independent of the greeting record.
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CustomRecord {
    pub custom_data_1: u32,
    pub custom_data_2: u32,
}

impl GreetingRecord {
    /// Borsh-encoded size: three u32 fields.
    pub const SPACE: usize = 12;

    pub fn decode(data: &[u8]) -> Result<Self, SessionError> {
        decode_exact(data, Self::SPACE)
    }
}

impl CustomRecord {
    /// Borsh-encoded size: two u32 fields.
    pub const SPACE: usize = 8;

    pub fn decode(data: &[u8]) -> Result<Self, SessionError> {
        decode_exact(data, Self::SPACE)
    }
}

/// Decode a fixed-width record, rejecting any length mismatch up front so a
/// truncated account never deserializes into a partially-zeroed value.
fn decode_exact<T: BorshDeserialize>(data: &[u8], space: usize) -> Result<T, SessionError> {
    if data.len() != space {
        return Err(SessionError::Decode {
            reason: format!("expected {} bytes, got {}", space, data.len()),
        });
    }
    T::try_from_slice(data).map_err(|e| SessionError::Decode {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_round_trip() {
        let record = GreetingRecord {
            input_a: 7,
            input_b: 35,
            sum: 42,
        };
        let bytes = borsh::to_vec(&record).unwrap();
        assert_eq!(bytes.len(), GreetingRecord::SPACE);
        assert_eq!(GreetingRecord::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn test_custom_round_trip() {
        let record = CustomRecord {
            custom_data_1: 1,
            custom_data_2: u32::MAX,
        };
        let bytes = borsh::to_vec(&record).unwrap();
        assert_eq!(bytes.len(), CustomRecord::SPACE);
        assert_eq!(CustomRecord::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn test_encoded_length_is_constant() {
        for record in [
            GreetingRecord::default(),
            GreetingRecord {
                input_a: u32::MAX,
                input_b: u32::MAX,
                sum: u32::MAX,
            },
            GreetingRecord {
                input_a: 1,
                input_b: 2,
                sum: 3,
            },
        ] {
            assert_eq!(borsh::to_vec(&record).unwrap().len(), GreetingRecord::SPACE);
        }
    }

    #[test]
    fn test_space_matches_zero_valued_record() {
        // The space reserved at account creation is derived from these
        // constants, so they must track the serialized schema size.
        let zeroed = borsh::to_vec(&GreetingRecord::default()).unwrap();
        assert_eq!(zeroed.len(), GreetingRecord::SPACE);

        let zeroed = borsh::to_vec(&CustomRecord::default()).unwrap();
        assert_eq!(zeroed.len(), CustomRecord::SPACE);
    }

    #[test]
    fn test_decode_rejects_truncated_data() {
        let short = vec![0u8; GreetingRecord::SPACE - 1];
        let err = GreetingRecord::decode(&short).unwrap_err();
        assert!(matches!(err, SessionError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_oversized_data() {
        let long = vec![0u8; GreetingRecord::SPACE + 4];
        let err = GreetingRecord::decode(&long).unwrap_err();
        assert!(matches!(err, SessionError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_empty_data() {
        assert!(CustomRecord::decode(&[]).is_err());
    }
}
