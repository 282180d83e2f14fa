pub(crate) fn u32_to_bytes(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub(crate) fn u64_to_bytes(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Big-endian integer of at most 8 bytes.
pub(crate) fn bytes_to_u64(bytes: &[u8]) -> u64 {
    debug_assert!(bytes.len() <= 8);
    bytes
        .iter()
        .fold(0_u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// The `len` least significant bytes of `value`, big-endian.
pub(crate) fn to_byte(value: u64, len: usize) -> Vec<u8> {
    let bytes = u64_to_bytes(value);
    let mut out = vec![0_u8; len];
    let take = len.min(8);
    out[len - take..].copy_from_slice(&bytes[8 - take..]);
    out
}

pub(crate) fn set_u32_at(array: &mut [u8], value: u32, start_index: usize) {
    array[start_index..start_index + 4].copy_from_slice(&u32_to_bytes(value));
}

pub(crate) fn set_u64_at(array: &mut [u8], value: u64, start_index: usize) {
    array[start_index..start_index + 8].copy_from_slice(&u64_to_bytes(value));
}

pub(crate) fn get_u32_at(array: &[u8], start_index: usize) -> u32 {
    let mut word = [0_u8; 4];
    word.copy_from_slice(&array[start_index..start_index + 4]);
    u32::from_be_bytes(word)
}

/// Keeps the `bits` least significant bits of `value`.
pub(crate) fn mask_low_bits(value: u64, bits: usize) -> u64 {
    match bits {
        0 => 0,
        b if b >= 64 => value,
        b => value & ((1_u64 << b) - 1),
    }
}

/// Splits `input` into `out_len` integers of `b` bits each, most significant bit first.
///
/// The bits are consumed as one continuous big-endian bit string, so an integer may
/// straddle a byte boundary. Missing trailing bits read as zero.
pub fn base_2b(input: &[u8], b: usize, out_len: usize) -> Vec<u32> {
    debug_assert!(b > 0 && b <= 32);

    let mask = (1_u64 << b) - 1;
    let mut output = Vec::with_capacity(out_len);
    let mut total: u64 = 0;
    let mut bits = 0;
    let mut input_index = 0;

    for _ in 0..out_len {
        while bits < b {
            let byte = input.get(input_index).copied().unwrap_or(0);
            total = (total << 8) | u64::from(byte);
            input_index += 1;
            bits += 8;
        }
        bits -= b;
        output.push(((total >> bits) & mask) as u32);
    }
    output
}

macro_rules! bytes_struct {
    ($(#[$meta:meta])* $type: ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Zeroize)]
        #[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
        pub struct $type(Vec<u8>);

        impl AsRef<[u8]> for $type {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<Vec<u8>> for $type {
            fn from(value: Vec<u8>) -> Self {
                Self(value)
            }
        }

        impl From<&[u8]> for $type {
            fn from(value: &[u8]) -> Self {
                Self(value.to_vec())
            }
        }

        impl PartialEq for $type {
            /// By no means constant time comparison
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl Eq for $type {}

        impl $type {
            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn into_bytes(self) -> Vec<u8> {
                self.0
            }
        }
    };
}

pub(crate) use bytes_struct;
