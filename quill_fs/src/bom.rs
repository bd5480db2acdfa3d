use crate::encoding::Encoding;

/// Byte-order mark for one encoding: up to four signature bytes and the
/// number of them in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BomSpec {
    signature: [u8; 4],
    len: usize,
}

impl BomSpec {
    /// The empty mark, used when no BOM is written
    pub const NONE: BomSpec = BomSpec {
        signature: [0; 4],
        len: 0,
    };

    pub fn bytes(&self) -> &[u8] {
        &self.signature[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Look up the standard BOM for an encoding.
pub fn bom_for(encoding: Encoding) -> BomSpec {
    match encoding {
        Encoding::Utf16 => BomSpec {
            signature: [0xFF, 0xFE, 0, 0],
            len: 2,
        },
        Encoding::Utf8 => BomSpec {
            signature: [0xEF, 0xBB, 0xBF, 0],
            len: 3,
        },
    }
}

/// Split a leading BOM for `encoding` off `bytes`.
///
/// Returns the remaining bytes and whether the signature was present.
pub fn strip_bom(bytes: &[u8], encoding: Encoding) -> (&[u8], bool) {
    let bom = bom_for(encoding);
    if bytes.len() >= bom.len() && bytes.starts_with(bom.bytes()) {
        (&bytes[bom.len()..], true)
    } else {
        (bytes, false)
    }
}
