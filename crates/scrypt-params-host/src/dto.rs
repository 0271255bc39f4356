//! Result objects handed back to the host.

use serde::{Deserialize, Serialize};

use scrypt_params_core::CostParameters;

/// `{N, r, p}` result object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsDto {
    /// CPU/memory cost factor.
    #[serde(rename = "N")]
    pub n: u64,
    /// Block-size factor.
    pub r: u32,
    /// Parallelization factor.
    pub p: u32,
}

impl From<CostParameters> for ParamsDto {
    fn from(params: CostParameters) -> Self {
        Self {
            n: params.n,
            r: params.r,
            p: params.p,
        }
    }
}

impl From<ParamsDto> for CostParameters {
    fn from(dto: ParamsDto) -> Self {
        Self {
            n: dto.n,
            r: dto.r,
            p: dto.p,
        }
    }
}

/// `{salt}` result object: a freshly generated salt, hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaltDto {
    /// Lowercase hex of the salt bytes.
    pub salt: String,
}

impl SaltDto {
    /// Encode raw salt bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            salt: data_encoding::HEXLOWER.encode(bytes),
        }
    }

    /// Salt length in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.salt.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_dto_snapshot() {
        let dto = ParamsDto::from(CostParameters {
            n: 16384,
            r: 8,
            p: 1,
        });
        insta::assert_json_snapshot!(dto, @r#"
        {
          "N": 16384,
          "r": 8,
          "p": 1
        }
        "#);
    }

    #[test]
    fn params_dto_parses_host_object() {
        let dto: ParamsDto = serde_json::from_str(r#"{"N":1024,"r":8,"p":4}"#).unwrap();
        assert_eq!(CostParameters::from(dto), CostParameters { n: 1024, r: 8, p: 4 });
    }

    #[test]
    fn salt_dto_snapshot() {
        let dto = SaltDto::from_bytes(&[0x00, 0x7f, 0xab, 0xff]);
        insta::assert_json_snapshot!(dto, @r#"
        {
          "salt": "007fabff"
        }
        "#);
        assert_eq!(dto.byte_len(), 4);
    }
}
