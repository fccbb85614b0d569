//! Classification tag derivation.
//!
//! Tags are an ordered list: the source stream first, then an optional
//! duration tag (`long`/`short`), then an optional source-class tag
//! (`GRB`/`transient`). Examples: `["Fermi", "long", "GRB"]`,
//! `["Fermi", "short", "transient"]`, `["AMON"]`.

use super::notice_types::NoticeType;
use super::voevent::VoEvent;

/// GBM `Most_Likely_Index` value for a gamma-ray burst.
const GBM_MOST_LIKELY_GRB: i64 = 4;

/// GBM T90 boundary between short and long bursts, seconds.
const GBM_SHORT_LONG_BOUNDARY_S: f64 = 2.048;

/// Derive ordered classification tags for a notice.
pub fn tags_for(notice_type: NoticeType, voevent: &VoEvent) -> Vec<String> {
    // AMON alerts are tagged by stream only, regardless of sub-type.
    if notice_type.is_amon() {
        return vec![voevent.stream()];
    }

    let mut tags = vec![voevent.stream()];

    if notice_type.is_fermi_gbm_position() {
        // Ground-position notices carry an "unknown" duration (or none at
        // all); only a definite long/short call is worth storing.
        if let Some(duration) = definite_duration(voevent.param("Long_short")) {
            tags.push(duration);
        }
        if voevent.param_i64("Most_Likely_Index") == Some(GBM_MOST_LIKELY_GRB) {
            tags.push("GRB".to_string());
        }
    }

    if notice_type == NoticeType::FermiGbmSubthresh {
        if let Some(duration_s) = voevent.param_f64("Duration") {
            if duration_s < GBM_SHORT_LONG_BOUNDARY_S {
                tags.push("short".to_string());
            } else {
                tags.push("long".to_string());
            }
        }
        tags.push("transient".to_string());
    }

    if notice_type == NoticeType::LvcRetraction {
        tags.push("retraction".to_string());
    }

    tags
}

fn definite_duration(value: Option<&str>) -> Option<String> {
    let lowered = value?.trim().to_lowercase();
    match lowered.as_str() {
        "long" | "short" => Some(lowered),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voevent(xml: &str) -> VoEvent {
        VoEvent::parse(xml.as_bytes()).unwrap()
    }

    fn fermi_notice(packet_type: i64, extra_params: &str) -> VoEvent {
        voevent(&format!(
            r#"<VOEvent ivorn="ivo://nasa.gsfc.gcn/Fermi#test" role="observation">
                 <What>
                   <Param name="Packet_Type" value="{packet_type}"/>
                   {extra_params}
                 </What>
               </VOEvent>"#
        ))
    }

    #[test]
    fn test_fin_pos_long_grb() {
        let v = fermi_notice(
            115,
            r#"<Param name="Long_short" value="Long"/>
               <Param name="Most_Likely_Index" value="4"/>"#,
        );
        assert_eq!(
            tags_for(NoticeType::FermiGbmFinPos, &v),
            vec!["Fermi", "long", "GRB"]
        );
    }

    #[test]
    fn test_gnd_pos_unknown_duration_dropped() {
        let v = fermi_notice(
            112,
            r#"<Param name="Long_short" value="unknown"/>
               <Param name="Most_Likely_Index" value="4"/>"#,
        );
        assert_eq!(tags_for(NoticeType::FermiGbmGndPos, &v), vec!["Fermi", "GRB"]);
    }

    #[test]
    fn test_gnd_pos_missing_duration() {
        let v = fermi_notice(112, r#"<Param name="Most_Likely_Index" value="4"/>"#);
        assert_eq!(tags_for(NoticeType::FermiGbmGndPos, &v), vec!["Fermi", "GRB"]);
    }

    #[test]
    fn test_alert_stream_only() {
        let v = fermi_notice(110, "");
        assert_eq!(tags_for(NoticeType::FermiGbmAlert, &v), vec!["Fermi"]);
    }

    #[test]
    fn test_subthreshold_short_transient() {
        let v = fermi_notice(131, r#"<Param name="Duration" value="0.384"/>"#);
        assert_eq!(
            tags_for(NoticeType::FermiGbmSubthresh, &v),
            vec!["Fermi", "short", "transient"]
        );
    }

    #[test]
    fn test_subthreshold_long_transient() {
        let v = fermi_notice(131, r#"<Param name="Duration" value="8.192"/>"#);
        assert_eq!(
            tags_for(NoticeType::FermiGbmSubthresh, &v),
            vec!["Fermi", "long", "transient"]
        );
    }

    #[test]
    fn test_amon_stream_only() {
        let v = voevent(
            r#"<VOEvent ivorn="ivo://nasa.gsfc.gcn/AMON#ICECUBE_HESE_Event" role="observation">
                 <What>
                   <Param name="Packet_Type" value="158"/>
                   <Param name="signalness" value="0.8"/>
                 </What>
               </VOEvent>"#,
        );
        assert_eq!(tags_for(NoticeType::AmonIceCubeHese, &v), vec!["AMON"]);
    }

    #[test]
    fn test_lvc_retraction_tagged() {
        let v = voevent(
            r#"<VOEvent ivorn="ivo://gwnet/LVC#S190425z-3-Retraction" role="observation">
                 <What><Param name="Packet_Type" value="164"/></What>
               </VOEvent>"#,
        );
        assert_eq!(
            tags_for(NoticeType::LvcRetraction, &v),
            vec!["LVC", "retraction"]
        );
    }
}
