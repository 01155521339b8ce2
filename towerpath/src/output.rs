//! Table writers using the registry's column names.

use anyhow::Result;
use linepath::{EnrichedSpan, Profile, ReconstructedLine};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct SpanRow<'a> {
    #[serde(rename = "EST1_SAP")]
    start_code: &'a str,
    #[serde(rename = "EST1_ALT_ORT")]
    start_altitude_m: Option<f64>,
    #[serde(rename = "EST1_LAT")]
    start_lat: Option<f64>,
    #[serde(rename = "EST1_LON")]
    start_lon: Option<f64>,
    #[serde(rename = "EST1_UTM_X")]
    start_x: Option<f64>,
    #[serde(rename = "EST1_UTM_Y")]
    start_y: Option<f64>,
    #[serde(rename = "EST1_FUSO")]
    start_zone: Option<String>,
    #[serde(rename = "EST1_ID")]
    start_sequence_id: Option<&'a str>,
    #[serde(rename = "EST1_ALTURA")]
    start_height_m: Option<f64>,
    #[serde(rename = "EST1_TIPO")]
    start_type: Option<&'a str>,
    #[serde(rename = "EST1_CARACT1")]
    start_characteristic1: Option<&'a str>,
    #[serde(rename = "EST1_CARACT2")]
    start_characteristic2: Option<&'a str>,
    #[serde(rename = "EST2_SAP")]
    end_code: &'a str,
    #[serde(rename = "EST2_ALT_ORT")]
    end_altitude_m: Option<f64>,
    #[serde(rename = "EST2_LAT")]
    end_lat: Option<f64>,
    #[serde(rename = "EST2_LON")]
    end_lon: Option<f64>,
    #[serde(rename = "EST2_UTM_X")]
    end_x: Option<f64>,
    #[serde(rename = "EST2_UTM_Y")]
    end_y: Option<f64>,
    #[serde(rename = "EST2_FUSO")]
    end_zone: Option<String>,
    #[serde(rename = "EST2_ID")]
    end_sequence_id: Option<&'a str>,
    #[serde(rename = "EST2_ALTURA")]
    end_height_m: Option<f64>,
    #[serde(rename = "EST2_TIPO")]
    end_type: Option<&'a str>,
    #[serde(rename = "EST2_CARACT1")]
    end_characteristic1: Option<&'a str>,
    #[serde(rename = "EST2_CARACT2")]
    end_characteristic2: Option<&'a str>,
    #[serde(rename = "NOME_LT")]
    line_label: &'a str,
    #[serde(rename = "SAP_LT")]
    line_code: &'a str,
    #[serde(rename = "DIS_M")]
    distance_m: Option<f64>,
    #[serde(rename = "DIS_GEOD_M")]
    geodesic_m: Option<f64>,
    #[serde(rename = "DIS_UTM_M")]
    planar_m: Option<f64>,
    #[serde(rename = "CRUZA_FUSO")]
    crossed_zone: bool,
    #[serde(rename = "VAO_CENTRO_LAT")]
    mid_lat: Option<f64>,
    #[serde(rename = "VAO_CENTRO_LONG")]
    mid_lon: Option<f64>,
    #[serde(rename = "VAO_CENTRO_ALT_ORT")]
    mid_altitude_m: Option<f64>,
}

impl<'a> From<&'a EnrichedSpan> for SpanRow<'a> {
    fn from(span: &'a EnrichedSpan) -> Self {
        let (start, end) = (&span.start, &span.end);
        Self {
            start_code: &start.code,
            start_altitude_m: start.altitude_m,
            start_lat: start.lat,
            start_lon: start.lon,
            start_x: start.planar.map(|p| p.x),
            start_y: start.planar.map(|p| p.y),
            start_zone: start.planar.map(|p| p.zone.to_string()),
            start_sequence_id: start.attributes.sequence_id.as_deref(),
            start_height_m: start.attributes.height_m,
            start_type: start.attributes.structure_type.as_deref(),
            start_characteristic1: start.attributes.characteristic1.as_deref(),
            start_characteristic2: start.attributes.characteristic2.as_deref(),
            end_code: &end.code,
            end_altitude_m: end.altitude_m,
            end_lat: end.lat,
            end_lon: end.lon,
            end_x: end.planar.map(|p| p.x),
            end_y: end.planar.map(|p| p.y),
            end_zone: end.planar.map(|p| p.zone.to_string()),
            end_sequence_id: end.attributes.sequence_id.as_deref(),
            end_height_m: end.attributes.height_m,
            end_type: end.attributes.structure_type.as_deref(),
            end_characteristic1: end.attributes.characteristic1.as_deref(),
            end_characteristic2: end.attributes.characteristic2.as_deref(),
            line_label: &span.line_label,
            line_code: &span.line_code,
            distance_m: span.distance_m(),
            geodesic_m: span.distance.map(|d| d.geodesic_m),
            planar_m: span.distance.and_then(|d| d.planar_m),
            crossed_zone: span.crossed_zone(),
            mid_lat: span.midpoint.lat,
            mid_lon: span.midpoint.lon,
            mid_altitude_m: span.midpoint.altitude_m,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProfileRow<'a> {
    #[serde(rename = "EST_SAP")]
    code: &'a str,
    #[serde(rename = "ALT_ORT")]
    altitude_m: Option<f64>,
    #[serde(rename = "DIS_CUM_KM")]
    distance_km: f64,
}

/// Per-line outcome of a bulk reconstruction.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    #[serde(rename = "NOME_LT")]
    pub label: &'a str,
    #[serde(rename = "SAP_LT")]
    pub code: &'a str,
    #[serde(rename = "VAOS")]
    pub spans: Option<usize>,
    #[serde(rename = "DIS_KM")]
    pub distance_km: Option<f64>,
    #[serde(rename = "INTEGRIDADE")]
    pub integrity: Option<bool>,
    #[serde(rename = "CRUZA_FUSO")]
    pub crossed_zone: Option<bool>,
    #[serde(rename = "ERRO")]
    pub error: Option<String>,
}

pub fn write_spans_csv<W: Write>(wtr: W, spans: &[EnrichedSpan]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(wtr);
    for span in spans {
        wtr.serialize(SpanRow::from(span))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_spans_json<W: Write>(mut wtr: W, line: &ReconstructedLine) -> Result<()> {
    serde_json::to_writer_pretty(&mut wtr, line)?;
    writeln!(wtr)?;
    Ok(())
}

pub fn write_profile_csv<W: Write>(wtr: W, profile: &Profile) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(wtr);
    for point in &profile.points {
        wtr.serialize(ProfileRow {
            code: &point.code,
            altitude_m: point.altitude_m,
            distance_km: point.distance_km,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_summaries_csv<W: Write>(wtr: W, summaries: &[Summary<'_>]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(wtr);
    for summary in summaries {
        wtr.serialize(summary)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{write_profile_csv, write_spans_csv};
    use linepath::{
        EnrichedSpan, Midpoint, Profile, ProfilePoint, ResolvedEndpoint, TowerAttributes,
    };

    fn endpoint(code: &str, lat: Option<f64>, lon: Option<f64>) -> ResolvedEndpoint {
        ResolvedEndpoint {
            code: code.into(),
            lat,
            lon,
            planar: None,
            altitude_m: None,
            attributes: TowerAttributes {
                structure_type: Some("SUSPENSAO".into()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_span_columns() {
        let span = EnrichedSpan {
            line_label: "LT TAQUARIL".into(),
            line_code: "LT-01".into(),
            start: endpoint("PORT-TQR", Some(-19.93), Some(-43.85)),
            end: endpoint("TW-001", None, None),
            midpoint: Midpoint::default(),
            distance: None,
        };
        let mut out = Vec::new();
        write_spans_csv(&mut out, &[span]).unwrap();
        let out = String::from_utf8(out).unwrap();
        let mut rows = out.lines();

        let header: Vec<&str> = rows.next().unwrap().split(',').collect();
        assert_eq!(header[0], "EST1_SAP");
        assert_eq!(header[12], "EST2_SAP");
        assert!(header.contains(&"DIS_M"));
        assert_eq!(header.last(), Some(&"VAO_CENTRO_ALT_ORT"));

        let row: Vec<&str> = rows.next().unwrap().split(',').collect();
        assert_eq!(row.len(), header.len());
        assert_eq!(row[0], "PORT-TQR");
        assert_eq!(row[2], "-19.93");
        assert_eq!(row[9], "SUSPENSAO");
        assert_eq!(row[14], "");
    }

    #[test]
    fn test_profile_columns() {
        let profile = Profile {
            points: vec![
                ProfilePoint {
                    code: "PORT-TQR".into(),
                    altitude_m: Some(901.0),
                    distance_km: 0.0,
                },
                ProfilePoint {
                    code: "TW-001".into(),
                    altitude_m: None,
                    distance_km: 0.5,
                },
            ],
            distance_m: 500.0,
        };
        let mut out = Vec::new();
        write_profile_csv(&mut out, &profile).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "EST_SAP,ALT_ORT,DIS_CUM_KM\nPORT-TQR,901.0,0.0\nTW-001,,0.5\n"
        );
    }
}
