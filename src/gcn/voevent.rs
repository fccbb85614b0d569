//! Read-only VOEvent document accessors.
//!
//! GCN notices are VOEvent 2.0 XML documents. We never define or validate the
//! schema here; the parser pulls out exactly the handful of values the
//! pipeline needs (ivorn, role, Who date, What params, WhereWhen time and
//! position) and leaves the rest of the document alone.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::models::time::parse_isotime;
use super::notice_types::NoticeType;

/// Sky cone from the `WhereWhen` section: best-fit position plus an error
/// radius, all in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConePosition {
    pub ra: f64,
    pub dec: f64,
    pub error_radius: f64,
}

/// Owned view of the VOEvent fields the pipeline consumes.
#[derive(Debug, Clone)]
pub struct VoEvent {
    pub ivorn: String,
    pub role: String,
    /// Notice creation date from `Who/Date`.
    pub who_date: Option<DateTime<Utc>>,
    /// All `What` Params by name, including Group-nested ones. First
    /// occurrence wins on duplicate names.
    pub params: HashMap<String, String>,
    /// Observation time from `WhereWhen` ISOTime.
    pub isotime: Option<DateTime<Utc>>,
    /// Best-fit position and error radius, when present.
    pub position: Option<ConePosition>,
}

impl VoEvent {
    /// Parse a raw notice payload.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload).context("Notice payload is not valid UTF-8")?;
        let doc = roxmltree::Document::parse(text).context("Failed to parse VOEvent XML")?;
        let root = doc.root_element();

        // The broker interleaves VTP Transport packets (iamalive heartbeats,
        // receipt acks) with notices on the same stream.
        if root.tag_name().name() == "Transport" {
            return Ok(Self {
                ivorn: root
                    .descendants()
                    .find(|n| n.has_tag_name("Origin"))
                    .and_then(|n| n.text())
                    .unwrap_or_default()
                    .to_string(),
                role: root.attribute("role").unwrap_or_default().to_string(),
                who_date: None,
                params: HashMap::new(),
                isotime: None,
                position: None,
            });
        }
        if root.tag_name().name() != "VOEvent" {
            bail!("Root element is {:?}, expected VOEvent", root.tag_name().name());
        }

        let ivorn = root
            .attribute("ivorn")
            .context("VOEvent is missing the ivorn attribute")?
            .to_string();
        let role = root.attribute("role").unwrap_or("observation").to_string();

        let who_date = root
            .children()
            .find(|n| n.has_tag_name("Who"))
            .and_then(|who| who.descendants().find(|n| n.has_tag_name("Date")))
            .and_then(|n| n.text())
            .map(parse_isotime)
            .transpose()
            .context("Invalid Who/Date value")?;

        let mut params = HashMap::new();
        if let Some(what) = root.children().find(|n| n.has_tag_name("What")) {
            for param in what.descendants().filter(|n| n.has_tag_name("Param")) {
                if let (Some(name), Some(value)) =
                    (param.attribute("name"), param.attribute("value"))
                {
                    params
                        .entry(name.to_string())
                        .or_insert_with(|| value.to_string());
                }
            }
        }

        let wherewhen = root.children().find(|n| n.has_tag_name("WhereWhen"));
        let isotime = wherewhen
            .and_then(|ww| ww.descendants().find(|n| n.has_tag_name("ISOTime")))
            .and_then(|n| n.text())
            .map(parse_isotime)
            .transpose()
            .context("Invalid WhereWhen ISOTime value")?;

        let position = wherewhen
            .and_then(|ww| ww.descendants().find(|n| n.has_tag_name("Position2D")))
            .and_then(parse_position);

        Ok(Self {
            ivorn,
            role,
            who_date,
            params,
            isotime,
            position,
        })
    }

    /// Source stream name from the ivorn path, e.g.
    /// `ivo://nasa.gsfc.gcn/Fermi#GBM_Fin_Pos...` yields `Fermi`.
    pub fn stream(&self) -> String {
        let path = self.ivorn.split('#').next().unwrap_or(&self.ivorn);
        path.rsplit('/').next().unwrap_or(path).to_string()
    }

    /// Look up a `What` Param by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn param_i64(&self, name: &str) -> Option<i64> {
        self.param(name).and_then(|v| v.trim().parse().ok())
    }

    pub fn param_f64(&self, name: &str) -> Option<f64> {
        self.param(name).and_then(|v| v.trim().parse().ok())
    }

    /// Resolve the notice type from the `Packet_Type` Param.
    pub fn notice_type(&self) -> Result<NoticeType> {
        let code = self
            .param_i64("Packet_Type")
            .context("Notice has no Packet_Type Param")?;
        NoticeType::try_from(code).map_err(Into::into)
    }

    /// Observation time of the underlying event.
    ///
    /// Normally the `WhereWhen` ISOTime; Fermi subthreshold notices carry the
    /// transient time as a `Trans_Ts` Param instead.
    pub fn dateobs(&self) -> Result<DateTime<Utc>> {
        if let Some(t) = self.isotime {
            return Ok(t);
        }
        if let Some(ts) = self.param("Trans_Ts") {
            return parse_isotime(ts);
        }
        bail!("Notice {} carries no observation time", self.ivorn)
    }

    /// True for the transport-level heartbeat packets the broker sends.
    pub fn is_iamalive(&self) -> bool {
        self.role == "iamalive"
    }
}

fn parse_position(node: roxmltree::Node<'_, '_>) -> Option<ConePosition> {
    let value2 = node.descendants().find(|n| n.has_tag_name("Value2"))?;
    let coord = |name: &str| -> Option<f64> {
        value2
            .descendants()
            .find(|n| n.has_tag_name(name))
            .and_then(|n| n.text())
            .and_then(|t| t.trim().parse().ok())
    };
    let ra = coord("C1")?;
    let dec = coord("C2")?;
    let error_radius = node
        .descendants()
        .find(|n| n.has_tag_name("Error2Radius"))
        .and_then(|n| n.text())
        .and_then(|t| t.trim().parse().ok())
        .unwrap_or(0.0);
    Some(ConePosition {
        ra,
        dec,
        error_radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<voe:VOEvent xmlns:voe="http://www.ivoa.net/xml/VOEvent/v2.0"
    ivorn="ivo://nasa.gsfc.gcn/Fermi#GBM_Fin_Pos2018-01-16T00:36:52.81_537755817_0-026"
    role="observation" version="2.0">
  <Who>
    <AuthorIVORN>ivo://nasa.gsfc.tan/gcn</AuthorIVORN>
    <Date>2018-01-16T00:46:05</Date>
  </Who>
  <What>
    <Param name="Packet_Type" value="115"/>
    <Param name="TrigID" value="537755817" ucd="meta.id"/>
    <Group name="Trigger_ID">
      <Param name="Long_short" value="Long"/>
      <Param name="Most_Likely_Index" value="4"/>
    </Group>
  </What>
  <WhereWhen>
    <ObsDataLocation>
      <ObservationLocation>
        <AstroCoords coord_system_id="UTC-FK5-GEO">
          <Time unit="s"><TimeInstant><ISOTime>2018-01-16T00:36:52.81</ISOTime></TimeInstant></Time>
          <Position2D unit="deg">
            <Value2><C1>184.37</C1><C2>-58.36</C2></Value2>
            <Error2Radius>5.0</Error2Radius>
          </Position2D>
        </AstroCoords>
      </ObservationLocation>
    </ObsDataLocation>
  </WhereWhen>
</voe:VOEvent>"#;

    #[test]
    fn test_parse_core_fields() {
        let voevent = VoEvent::parse(SAMPLE.as_bytes()).unwrap();
        assert!(voevent.ivorn.starts_with("ivo://nasa.gsfc.gcn/Fermi#GBM_Fin_Pos"));
        assert_eq!(voevent.role, "observation");
        assert_eq!(voevent.stream(), "Fermi");
        assert_eq!(voevent.notice_type().unwrap(), NoticeType::FermiGbmFinPos);
    }

    #[test]
    fn test_group_nested_params_visible() {
        let voevent = VoEvent::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(voevent.param("Long_short"), Some("Long"));
        assert_eq!(voevent.param_i64("Most_Likely_Index"), Some(4));
    }

    #[test]
    fn test_position_and_time() {
        let voevent = VoEvent::parse(SAMPLE.as_bytes()).unwrap();
        let pos = voevent.position.unwrap();
        assert_eq!(pos.ra, 184.37);
        assert_eq!(pos.dec, -58.36);
        assert_eq!(pos.error_radius, 5.0);
        let dateobs = voevent.dateobs().unwrap();
        assert_eq!(dateobs.timestamp_subsec_millis(), 810);
    }

    #[test]
    fn test_who_date() {
        let voevent = VoEvent::parse(SAMPLE.as_bytes()).unwrap();
        let date = voevent.who_date.unwrap();
        assert_eq!(date.to_rfc3339(), "2018-01-16T00:46:05+00:00");
    }

    #[test]
    fn test_rejects_non_voevent() {
        assert!(VoEvent::parse(b"<html></html>").is_err());
        assert!(VoEvent::parse(b"not xml at all").is_err());
    }

    #[test]
    fn test_transport_iamalive() {
        let xml = br#"<trn:Transport role="iamalive" version="1.0"
            xmlns:trn="http://telescope-networks.org/schema/Transport/v1.1">
            <Origin>ivo://nasa.gsfc.gcn</Origin>
            <TimeStamp>2018-01-16T00:46:05Z</TimeStamp>
        </trn:Transport>"#;
        let voevent = VoEvent::parse(xml).unwrap();
        assert!(voevent.is_iamalive());
        assert_eq!(voevent.ivorn, "ivo://nasa.gsfc.gcn");
    }
}
