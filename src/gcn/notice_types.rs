use serde::{Deserialize, Serialize};

/// GCN packet types handled by the pipeline.
///
/// The numeric codes are the `Packet_Type` values from the GCN/TAN registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoticeType {
    FermiGbmAlert,
    FermiGbmFltPos,
    FermiGbmGndPos,
    FermiGbmFinPos,
    FermiGbmSubthresh,
    LvcPreliminary,
    LvcInitial,
    LvcUpdate,
    LvcRetraction,
    AmonIceCubeCoinc,
    AmonIceCubeHese,
    AmonIceCubeEhe,
}

impl NoticeType {
    /// Numeric `Packet_Type` code for this notice type.
    pub fn code(&self) -> i64 {
        match self {
            Self::FermiGbmAlert => 110,
            Self::FermiGbmFltPos => 111,
            Self::FermiGbmGndPos => 112,
            Self::FermiGbmFinPos => 115,
            Self::FermiGbmSubthresh => 131,
            Self::LvcPreliminary => 150,
            Self::LvcInitial => 151,
            Self::LvcUpdate => 152,
            Self::LvcRetraction => 164,
            Self::AmonIceCubeCoinc => 157,
            Self::AmonIceCubeHese => 158,
            Self::AmonIceCubeEhe => 169,
        }
    }

    /// True for Fermi GBM on-board/ground/final position notices.
    pub fn is_fermi_gbm_position(&self) -> bool {
        matches!(
            self,
            Self::FermiGbmFltPos | Self::FermiGbmGndPos | Self::FermiGbmFinPos
        )
    }

    /// True for any AMON neutrino alert.
    pub fn is_amon(&self) -> bool {
        matches!(
            self,
            Self::AmonIceCubeCoinc | Self::AmonIceCubeHese | Self::AmonIceCubeEhe
        )
    }

    /// True for LIGO/Virgo gravitational-wave notices.
    pub fn is_lvc(&self) -> bool {
        matches!(
            self,
            Self::LvcPreliminary | Self::LvcInitial | Self::LvcUpdate | Self::LvcRetraction
        )
    }
}

impl TryFrom<i64> for NoticeType {
    type Error = UnknownNoticeType;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            110 => Ok(Self::FermiGbmAlert),
            111 => Ok(Self::FermiGbmFltPos),
            112 => Ok(Self::FermiGbmGndPos),
            115 => Ok(Self::FermiGbmFinPos),
            131 => Ok(Self::FermiGbmSubthresh),
            150 => Ok(Self::LvcPreliminary),
            151 => Ok(Self::LvcInitial),
            152 => Ok(Self::LvcUpdate),
            164 => Ok(Self::LvcRetraction),
            157 => Ok(Self::AmonIceCubeCoinc),
            158 => Ok(Self::AmonIceCubeHese),
            169 => Ok(Self::AmonIceCubeEhe),
            other => Err(UnknownNoticeType(other)),
        }
    }
}

/// Error for packet types outside the handled registry subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unhandled GCN packet type: {0}")]
pub struct UnknownNoticeType(pub i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for nt in [
            NoticeType::FermiGbmAlert,
            NoticeType::FermiGbmFltPos,
            NoticeType::FermiGbmGndPos,
            NoticeType::FermiGbmFinPos,
            NoticeType::FermiGbmSubthresh,
            NoticeType::LvcPreliminary,
            NoticeType::LvcInitial,
            NoticeType::LvcUpdate,
            NoticeType::LvcRetraction,
            NoticeType::AmonIceCubeCoinc,
            NoticeType::AmonIceCubeHese,
            NoticeType::AmonIceCubeEhe,
        ] {
            assert_eq!(NoticeType::try_from(nt.code()).unwrap(), nt);
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(NoticeType::try_from(61), Err(UnknownNoticeType(61)));
    }

    #[test]
    fn test_family_predicates() {
        assert!(NoticeType::FermiGbmGndPos.is_fermi_gbm_position());
        assert!(!NoticeType::FermiGbmAlert.is_fermi_gbm_position());
        assert!(NoticeType::AmonIceCubeHese.is_amon());
        assert!(NoticeType::LvcRetraction.is_lvc());
    }
}
