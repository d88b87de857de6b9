//! Decoding of planning pages, which Sedna serves in Windows-1252.

use encoding_rs::WINDOWS_1252;

use crate::sedna::errors::SednaError;

/// Decode planning-page bytes. Any declared charset is ignored; month names
/// like `Fév` only match after this step.
pub fn decode_planning(bytes: &[u8]) -> Result<String, SednaError> {
    let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    if had_errors {
        return Err(SednaError::Decode {
            encoding: WINDOWS_1252.name(),
            message: "byte sequence has no Windows-1252 mapping".into(),
        });
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_accented_months() {
        // "Fév" and "Déc" with é as the single byte 0xE9, "Aoû" with û as 0xFB.
        let bytes = b"ma 4 F\xe9v / je 2 D\xe9c / ve 8 Ao\xfbt";
        assert_eq!(
            decode_planning(bytes).unwrap(),
            "ma 4 Fév / je 2 Déc / ve 8 Août"
        );
    }

    #[test]
    fn test_utf8_bom_is_not_honoured() {
        let decoded = decode_planning(b"\xef\xbb\xbfok").unwrap();
        assert_eq!(decoded, "ï»¿ok");
    }

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(
            decode_planning(b"lu 14 Mar 8h00-10h00").unwrap(),
            "lu 14 Mar 8h00-10h00"
        );
    }
}
