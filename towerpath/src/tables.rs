//! Registry CSV exports.
//!
//! The structures and connections tables use the registry's fixed
//! column names. Blank or unparsable numbers read as missing.

use crate::options::{LineTable, Tables as TableArgs};
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, Trim};
use linepath::{Connection, Endpoint, Line, Midpoint, Structure, Tables, TowerAttributes};
use log::debug;
use serde::{de::DeserializeOwned, Deserialize};
use std::{fs::File, io::Read, path::Path};

#[derive(Debug, Deserialize)]
struct StructureRow {
    #[serde(rename = "COD_ESTRUTURA_SAP")]
    code: String,
    #[serde(rename = "COD_LT_SAP")]
    line_code: String,
    #[serde(rename = "NUM_LATITUDE", default, deserialize_with = "csv::invalid_option")]
    lat: Option<f64>,
    #[serde(rename = "NUM_LONGITUDE", default, deserialize_with = "csv::invalid_option")]
    lon: Option<f64>,
    #[serde(rename = "NUM_ALTITUDE_ORT", default, deserialize_with = "csv::invalid_option")]
    altitude_m: Option<f64>,
    #[serde(rename = "NUM_ID_SEQUENCIA", default)]
    sequence_id: Option<String>,
    #[serde(rename = "VAL_ALTURA", default, deserialize_with = "csv::invalid_option")]
    height_m: Option<f64>,
    #[serde(rename = "DES_TIP_ESTRUTURA", default)]
    structure_type: Option<String>,
    #[serde(rename = "DES_CARACTERISTICA1", default)]
    characteristic1: Option<String>,
    #[serde(rename = "DES_CARACTERISTICA2", default)]
    characteristic2: Option<String>,
}

impl From<StructureRow> for Structure {
    fn from(row: StructureRow) -> Self {
        Self {
            code: row.code,
            line_code: row.line_code,
            lat: row.lat,
            lon: row.lon,
            altitude_m: row.altitude_m,
            attributes: TowerAttributes {
                sequence_id: row.sequence_id,
                height_m: row.height_m,
                structure_type: row.structure_type,
                characteristic1: row.characteristic1,
                characteristic2: row.characteristic2,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConnectionRow {
    #[serde(rename = "COD_LT_SAP")]
    line_code: String,
    #[serde(rename = "COD_ESTRUTURA_INI_SAP")]
    start_code: String,
    #[serde(rename = "NUM_LATITUDE_ESTRUTURA_INI", default, deserialize_with = "csv::invalid_option")]
    start_lat: Option<f64>,
    #[serde(rename = "NUM_LONGITUDE_ESTRUTURA_INI", default, deserialize_with = "csv::invalid_option")]
    start_lon: Option<f64>,
    #[serde(rename = "NUM_ALTITUDE_ORT_ESTRUTURA_INI", default, deserialize_with = "csv::invalid_option")]
    start_altitude_m: Option<f64>,
    #[serde(rename = "COD_ESTRUTURA_FIM_SAP")]
    end_code: String,
    #[serde(rename = "NUM_LATITUDE_ESTRUTURA_FIM", default, deserialize_with = "csv::invalid_option")]
    end_lat: Option<f64>,
    #[serde(rename = "NUM_LONGITUDE_ESTRUTURA_FIM", default, deserialize_with = "csv::invalid_option")]
    end_lon: Option<f64>,
    #[serde(rename = "NUM_ALTITUDE_ORT_ESTRUTURA_FIM", default, deserialize_with = "csv::invalid_option")]
    end_altitude_m: Option<f64>,
    #[serde(rename = "NUM_LATITUDE_PONTO_CENTRAL", default, deserialize_with = "csv::invalid_option")]
    mid_lat: Option<f64>,
    #[serde(rename = "NUM_LONGITUDE_PONTO_CENTRAL", default, deserialize_with = "csv::invalid_option")]
    mid_lon: Option<f64>,
    #[serde(rename = "NUM_ALTITUDE_ORT_PONTO_CENTRAL", default, deserialize_with = "csv::invalid_option")]
    mid_altitude_m: Option<f64>,
}

impl From<ConnectionRow> for Connection {
    fn from(row: ConnectionRow) -> Self {
        Self {
            line_code: row.line_code,
            start: Endpoint {
                code: row.start_code,
                lat: row.start_lat,
                lon: row.start_lon,
                altitude_m: row.start_altitude_m,
            },
            end: Endpoint {
                code: row.end_code,
                lat: row.end_lat,
                lon: row.end_lon,
                altitude_m: row.end_altitude_m,
            },
            midpoint: Midpoint {
                lat: row.mid_lat,
                lon: row.mid_lon,
                altitude_m: row.mid_altitude_m,
            },
        }
    }
}

/// Reads all three tables.
pub fn load(args: &TableArgs) -> Result<Tables> {
    let now = std::time::Instant::now();
    let tables = Tables {
        lines: load_lines(&args.lines)?,
        structures: read_rows::<StructureRow, Structure, _>(open(&args.structures)?)
            .with_context(|| format!("reading {}", args.structures.display()))?,
        connections: read_rows::<ConnectionRow, Connection, _>(open(&args.connections)?)
            .with_context(|| format!("reading {}", args.connections.display()))?,
    };
    debug!(
        "load; lines: {}, structures: {}, connections: {}, exec: {:?}",
        tables.lines.len(),
        tables.structures.len(),
        tables.connections.len(),
        now.elapsed()
    );
    Ok(tables)
}

pub fn load_lines(table: &LineTable) -> Result<Vec<Line>> {
    read_lines(open(&table.lines)?, &table.label_column, &table.code_column)
        .with_context(|| format!("reading {}", table.lines.display()))
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}

fn read_rows<Row, T, R>(rdr: R) -> Result<Vec<T>>
where
    Row: DeserializeOwned + Into<T>,
    R: Read,
{
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(rdr);
    let mut rows = Vec::new();
    for row in rdr.deserialize::<Row>() {
        rows.push(row?.into());
    }
    Ok(rows)
}

/// Reads the lines table, whose column names vary between exports.
///
/// Rows with a blank label or code are skipped.
fn read_lines<R: Read>(rdr: R, label_column: &str, code_column: &str) -> Result<Vec<Line>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(rdr);
    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| anyhow!("no column '{name}' in lines table"))
    };
    let label_idx = column(label_column)?;
    let code_idx = column(code_column)?;

    let mut lines = Vec::new();
    for record in rdr.records() {
        let record = record?;
        match (record.get(label_idx), record.get(code_idx)) {
            (Some(label), Some(code)) if !label.is_empty() && !code.is_empty() => {
                lines.push(Line {
                    label: label.to_owned(),
                    code: code.to_owned(),
                });
            }
            _ => {}
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::{read_lines, read_rows, ConnectionRow, StructureRow};
    use linepath::{Connection, Structure};

    #[test]
    fn test_read_lines() {
        let data = "COD_LT_SAP,NOME_LT,TENSAO\nLT-01, LT TAQUARIL ,138\nLT-02,,138\nLT-03,LT BARREIRO,230\n";
        let lines = read_lines(data.as_bytes(), "NOME_LT", "COD_LT_SAP").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label, "LT TAQUARIL");
        assert_eq!(lines[1].code, "LT-03");

        assert!(read_lines(data.as_bytes(), "NOME", "COD_LT_SAP").is_err());
    }

    #[test]
    fn test_read_structures() {
        let data = "\
COD_ESTRUTURA_SAP,COD_LT_SAP,NUM_LATITUDE,NUM_LONGITUDE,NUM_ALTITUDE_ORT,NUM_ID_SEQUENCIA,VAL_ALTURA,DES_TIP_ESTRUTURA,DES_CARACTERISTICA1,DES_CARACTERISTICA2
TW-001,LT-01,-19.9317348003,-43.8526956561,901.5,1,32.5,SUSPENSAO,ESTAIADA,
TW-002,LT-01,,n/a,NaN,2,,ANCORAGEM,,
";
        let structures: Vec<Structure> = read_rows::<StructureRow, _, _>(data.as_bytes()).unwrap();
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[0].lat, Some(-19.9317348003));
        assert_eq!(structures[0].altitude_m, Some(901.5));
        assert_eq!(structures[0].attributes.sequence_id.as_deref(), Some("1"));
        assert_eq!(structures[0].attributes.characteristic2, None);
        assert_eq!(structures[1].lat, None);
        assert_eq!(structures[1].lon, None);
        assert!(structures[1].altitude_m.is_some_and(f64::is_nan));
        assert_eq!(structures[1].coord(), None);
    }

    #[test]
    fn test_read_connections() {
        let data = "\
COD_LT_SAP,COD_ESTRUTURA_INI_SAP,NUM_LATITUDE_ESTRUTURA_INI,NUM_LONGITUDE_ESTRUTURA_INI,NUM_ALTITUDE_ORT_ESTRUTURA_INI,COD_ESTRUTURA_FIM_SAP,NUM_LATITUDE_ESTRUTURA_FIM,NUM_LONGITUDE_ESTRUTURA_FIM,NUM_ALTITUDE_ORT_ESTRUTURA_FIM,NUM_LATITUDE_PONTO_CENTRAL,NUM_LONGITUDE_PONTO_CENTRAL,NUM_ALTITUDE_ORT_PONTO_CENTRAL
LT-01,PORT-TQR,-19.9317348003,-43.8526956561,0,TW-001,,,,-19.932,-43.853,903
";
        let connections: Vec<Connection> =
            read_rows::<ConnectionRow, _, _>(data.as_bytes()).unwrap();
        assert_eq!(connections.len(), 1);
        let connection = &connections[0];
        assert_eq!(connection.start.code, "PORT-TQR");
        assert_eq!(connection.start.altitude_m, Some(0.0));
        assert_eq!(connection.end.code, "TW-001");
        assert_eq!(connection.end.lat, None);
        assert_eq!(connection.midpoint.altitude_m, Some(903.0));
    }
}
