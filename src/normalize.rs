//! Reshape the raw frames into the tables stored in the warehouse.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use jiff::civil::Date;

use crate::error::{EtlError, Result};
use crate::frame::{field, Column, ColumnType, Field, Frame, FrameError, Schema, Value};

/// Identifier columns of the time series files, in output order.
pub const ID_COLUMNS: [&str; 4] = ["Country/Region", "Province/State", "Lat", "Long"];

/// Join key of the confirmed and deaths series after unpivoting.
pub const DAILY_JOIN_KEYS: [&str; 5] = ["country_region", "province_state", "lat", "long", "date"];

/// One observation per region per day.
pub const DAILY_UNIQUE_KEYS: [&str; 3] = ["country_region", "province_state", "date"];

pub const WORLD_NAME_COLUMN: &str = "country_or_dependency";

const DAILY_FIELDS: [Field; 8] = [
    field("country_region", ColumnType::Str, false),
    field("province_state", ColumnType::Str, true),
    field("lat", ColumnType::Float, true),
    field("long", ColumnType::Float, true),
    field("date", ColumnType::Date, false),
    field("confirmed", ColumnType::Float, true),
    field("deaths", ColumnType::Float, true),
    field("country_code", ColumnType::Str, true),
];

pub const DAILY_STATS: Schema = Schema {
    name: "daily_stats",
    fields: &DAILY_FIELDS,
    extra: None,
};

const WORLD_FIELDS: [Field; 3] = [
    field(WORLD_NAME_COLUMN, ColumnType::Str, false),
    field("population", ColumnType::Float, true),
    field("country_code", ColumnType::Str, true),
];

/// Every column of the population table besides the name and the code is
/// numeric.
pub const WORLD_STATS: Schema = Schema {
    name: "world_stats",
    fields: &WORLD_FIELDS,
    extra: Some(ColumnType::Float),
};

/// Labels the warehouse accepts: `Country/Region` -> `country_region`.
pub fn warehouse_label(label: &str) -> String {
    label.to_lowercase().replace('/', "_")
}

/// `Density (P/Km²)` -> `density_pkm`.  Only `[a-z #]` survive.
pub fn world_label(label: &str) -> String {
    let kept: String = label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || *c == ' ' || *c == '#')
        .collect();
    kept.trim().replace(' ', "_")
}

/// Parse the `M/D/YY` labels of the time series columns.
pub fn parse_us_date(s: &str) -> Result<Date> {
    let bad = || EtlError::BadDate(s.to_string());
    let parts: Vec<&str> = s.trim().split('/').collect();
    let [m, d, y] = parts.as_slice() else {
        return Err(bad());
    };
    let month: i8 = m.parse().map_err(|_| bad())?;
    let day: i8 = d.parse().map_err(|_| bad())?;
    let mut year: i16 = y.parse().map_err(|_| bad())?;
    if y.len() <= 2 {
        year += 2000;
    }
    Date::new(year, month, day).map_err(|_| bad())
}

/// Strip thousands separators and percent signs.  An empty cell or `N.A.`
/// is missing (NaN); anything else must be a number.
pub fn parse_number(column: &str, raw: &str) -> Result<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '%').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "N.A." {
        return Ok(f64::NAN);
    }
    cleaned.parse::<f64>().map_err(|_| EtlError::NotNumeric {
        column: column.to_string(),
        value: raw.to_string(),
    })
}

fn parse_float_cell(column: &str, value: &Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            EtlError::NotNumeric {
                column: column.to_string(),
                value: s.clone(),
            }
        }),
        Value::Date(d) => Err(EtlError::NotNumeric {
            column: column.to_string(),
            value: d.to_string(),
        }),
    }
}

/// Turn one column per date into one row per (region, date) with the value
/// stored under `metric`.  Rows come out grouped by input row, dates in
/// column order.
pub fn unpivot_time_series(raw: &Frame, metric: &str) -> Result<Frame> {
    let ids: Vec<&Column> = ID_COLUMNS
        .iter()
        .map(|name| {
            raw.column(name).ok_or_else(|| {
                EtlError::Schema(format!(
                    "time series is missing column '{}', found [{}]",
                    name,
                    raw.labels().join(", ")
                ))
            })
        })
        .collect::<Result<_>>()?;

    let dates: Vec<(&Column, Date)> = raw
        .columns()
        .iter()
        .filter(|c| !ID_COLUMNS.contains(&c.name.as_str()))
        .map(|c| {
            parse_us_date(&c.name).map(|d| (c, d)).map_err(|_| {
                EtlError::Schema(format!(
                    "time series column '{}' is neither an identifier nor a M/D/YY date",
                    c.name
                ))
            })
        })
        .collect::<Result<_>>()?;
    if dates.is_empty() {
        return Err(EtlError::Schema(
            "time series has no date columns".to_string(),
        ));
    }

    let lat: Vec<Value> = ids[2]
        .values
        .iter()
        .map(|v| parse_float_cell(ID_COLUMNS[2], v))
        .collect::<Result<_>>()?;
    let long: Vec<Value> = ids[3]
        .values
        .iter()
        .map(|v| parse_float_cell(ID_COLUMNS[3], v))
        .collect::<Result<_>>()?;

    let n = raw.height() * dates.len();
    let mut out: [Vec<Value>; 6] = Default::default();
    for v in out.iter_mut() {
        v.reserve(n);
    }
    for row in 0..raw.height() {
        for (column, date) in &dates {
            out[0].push(ids[0].values[row].clone());
            out[1].push(ids[1].values[row].clone());
            out[2].push(lat[row].clone());
            out[3].push(long[row].clone());
            out[4].push(Value::Date(*date));
            out[5].push(parse_float_cell(&column.name, &column.values[row])?);
        }
    }

    let labels = ID_COLUMNS
        .iter()
        .map(|l| warehouse_label(l))
        .chain(["date".to_string(), metric.to_string()]);
    let mut frame = Frame::new();
    for (label, values) in labels.zip(out) {
        frame.push_column(label, values)?;
    }
    Ok(frame)
}

fn key_of(columns: &[&Column], i: usize) -> String {
    columns.iter().map(|c| format!("{:?}", c.values[i])).join(", ")
}

/// Inner join on `keys`.  The result keeps the left row order, all left
/// columns, then the right columns that are not keys.  Right-hand keys must
/// be unique.
pub fn join_on(left: &Frame, right: &Frame, keys: &[&str]) -> Result<Frame> {
    let left_keys: Vec<&Column> = keys
        .iter()
        .map(|k| left.require(k))
        .collect::<Result<_, FrameError>>()?;
    let right_keys: Vec<&Column> = keys
        .iter()
        .map(|k| right.require(k))
        .collect::<Result<_, FrameError>>()?;

    let mut index: HashMap<String, usize> = HashMap::with_capacity(right.height());
    for j in 0..right.height() {
        let key = key_of(&right_keys, j);
        if index.insert(key.clone(), j).is_some() {
            return Err(EtlError::DuplicateKey(key));
        }
    }

    let pairs: Vec<(usize, usize)> = (0..left.height())
        .filter_map(|i| index.get(&key_of(&left_keys, i)).map(|&j| (i, j)))
        .collect();

    let mut out = Frame::new();
    for column in left.columns() {
        let values = pairs.iter().map(|(i, _)| column.values[*i].clone()).collect();
        out.push_column(column.name.clone(), values)?;
    }
    for column in right
        .columns()
        .iter()
        .filter(|c| !keys.contains(&c.name.as_str()))
    {
        let values = pairs.iter().map(|(_, j)| column.values[*j].clone()).collect();
        out.push_column(column.name.clone(), values)?;
    }
    Ok(out)
}

pub fn ensure_unique(frame: &Frame, keys: &[&str]) -> Result<()> {
    let columns: Vec<&Column> = keys
        .iter()
        .map(|k| frame.require(k))
        .collect::<Result<_, FrameError>>()?;
    let mut seen: HashSet<String> = HashSet::with_capacity(frame.height());
    for i in 0..frame.height() {
        let key = key_of(&columns, i);
        if !seen.insert(key.clone()) {
            return Err(EtlError::DuplicateKey(key));
        }
    }
    Ok(())
}

/// Relabel the scraped population table, drop the rank column and parse
/// every column after the country name as a number.
pub fn normalize_world_stats(mut frame: Frame) -> Result<Frame> {
    frame.rename_with(world_label)?;
    if frame.drop_column("#").is_err() {
        return Err(EtlError::Schema(format!(
            "world stats has no '#' column, found [{}]",
            frame.labels().join(", ")
        )));
    }
    match frame.columns().first() {
        Some(c) if c.name == WORLD_NAME_COLUMN => {}
        _ => {
            return Err(EtlError::Schema(format!(
                "world stats should start with '{}', found [{}]",
                WORLD_NAME_COLUMN,
                frame.labels().join(", ")
            )))
        }
    }

    let numeric: Vec<String> = frame.labels().iter().skip(1).map(|l| l.to_string()).collect();
    for label in &numeric {
        frame.map_values(label, |column, v| match v {
            Value::Str(s) => parse_number(column, s).map(Value::Float),
            Value::Null => Ok(Value::Float(f64::NAN)),
            other => parse_float_cell(column, other),
        })?;
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use jiff::civil::date;

    use super::*;
    use crate::fetch::{parse_csv, parse_html_table};
    use crate::fixtures;

    #[test]
    fn labels() {
        assert_eq!(warehouse_label("Country/Region"), "country_region");
        assert_eq!(warehouse_label("Lat"), "lat");
        assert_eq!(world_label("Country (or dependency)"), "country_or_dependency");
        assert_eq!(world_label("Population (2020)"), "population");
        assert_eq!(world_label("Density (P/Km²)"), "density_pkm");
        assert_eq!(world_label("Fert. Rate"), "fert_rate");
        assert_eq!(world_label("Urban Pop %"), "urban_pop");
        assert_eq!(world_label("#"), "#");
    }

    #[test]
    fn us_dates() {
        assert_eq!(parse_us_date("1/22/20").unwrap(), date(2020, 1, 22));
        assert_eq!(parse_us_date("12/3/2021").unwrap(), date(2021, 12, 3));
        assert!(matches!(parse_us_date("2/30/20"), Err(EtlError::BadDate(_))));
        assert!(parse_us_date("Lat").is_err());
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number("x", "1,234").unwrap(), 1234.0);
        assert_eq!(parse_number("x", "12.5%").unwrap(), 12.5);
        assert_eq!(parse_number("x", " -62,920 ").unwrap(), -62920.0);
        assert!(parse_number("x", "N.A.").unwrap().is_nan());
        assert!(parse_number("x", "").unwrap().is_nan());
        let err = parse_number("migrants_net", "n/a").unwrap_err();
        assert!(matches!(err, EtlError::NotNumeric { .. }));
    }

    #[test]
    fn unpivot_shape() -> Result<(), Box<dyn Error>> {
        let raw = parse_csv(
            "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20,1/24/20\n\
             ,Afghanistan,33.9,67.7,0,1,2\n\
             Ontario,Canada,51.2,-85.3,0,0,1\n\
             Quebec,Canada,52.9,-73.5,,3,4\n",
        )?;
        let frame = unpivot_time_series(&raw, "confirmed")?;
        assert_eq!(frame.height(), raw.height() * 3);
        assert_eq!(
            frame.labels(),
            vec!["country_region", "province_state", "lat", "long", "date", "confirmed"]
        );
        ensure_unique(&frame, &DAILY_JOIN_KEYS)?;
        assert_eq!(frame.value("province_state", 3), Some(&Value::Str("Ontario".to_string())));
        assert_eq!(frame.value("date", 5), Some(&Value::Date(date(2020, 1, 24))));
        assert_eq!(frame.value("confirmed", 5), Some(&Value::Float(1.0)));
        assert_eq!(frame.value("confirmed", 6), Some(&Value::Null));
        Ok(())
    }

    #[test]
    fn unpivot_rejects_unknown_columns() -> Result<(), Box<dyn Error>> {
        let raw = parse_csv("Province/State,Country/Region,Lat,Long,Notes\n,Peru,1,2,x\n")?;
        let err = unpivot_time_series(&raw, "confirmed").unwrap_err();
        assert!(err.to_string().contains("'Notes'"));

        let raw = parse_csv("Country/Region,Lat,Long,1/22/20\nPeru,1,2,0\n")?;
        let err = unpivot_time_series(&raw, "confirmed").unwrap_err();
        assert!(err.to_string().contains("missing column 'Province/State'"));

        let raw = parse_csv("Province/State,Country/Region,Lat,Long\n,Peru,1,2\n")?;
        assert!(unpivot_time_series(&raw, "confirmed").is_err());
        Ok(())
    }

    #[test]
    fn join_confirmed_and_deaths() -> Result<(), Box<dyn Error>> {
        let confirmed = unpivot_time_series(&parse_csv(fixtures::CONFIRMED_CSV)?, "confirmed")?;
        let deaths = unpivot_time_series(&parse_csv(fixtures::DEATHS_CSV)?, "deaths")?;
        let joined = join_on(&confirmed, &deaths, &DAILY_JOIN_KEYS)?;
        assert_eq!(joined.height(), 2);
        assert_eq!(
            joined.labels(),
            vec!["country_region", "province_state", "lat", "long", "date", "confirmed", "deaths"]
        );
        assert_eq!(joined.value("date", 0), Some(&Value::Date(date(2020, 1, 22))));
        assert_eq!(joined.value("date", 1), Some(&Value::Date(date(2020, 1, 23))));
        assert_eq!(joined.value("confirmed", 1), Some(&Value::Float(1.0)));
        assert_eq!(joined.value("deaths", 1), Some(&Value::Float(0.0)));
        Ok(())
    }

    #[test]
    fn join_drops_unmatched_and_rejects_duplicates() -> Result<(), Box<dyn Error>> {
        let left = Frame::from_rows(
            vec!["k".to_string(), "a".to_string()],
            vec![
                vec![Value::Str("x".to_string()), Value::Float(1.0)],
                vec![Value::Str("y".to_string()), Value::Float(2.0)],
                vec![Value::Null, Value::Float(3.0)],
            ],
        )?;
        let right = Frame::from_rows(
            vec!["k".to_string(), "b".to_string()],
            vec![
                vec![Value::Null, Value::Float(30.0)],
                vec![Value::Str("x".to_string()), Value::Float(10.0)],
            ],
        )?;
        let joined = join_on(&left, &right, &["k"])?;
        assert_eq!(joined.height(), 2);
        assert_eq!(joined.require("b")?.values, vec![Value::Float(10.0), Value::Float(30.0)]);

        let err = join_on(&right, &left, &["a"]);
        assert!(err.is_err());
        let doubled = Frame::from_rows(
            vec!["k".to_string(), "b".to_string()],
            vec![
                vec![Value::Str("x".to_string()), Value::Float(1.0)],
                vec![Value::Str("x".to_string()), Value::Float(2.0)],
            ],
        )?;
        let err = join_on(&left, &doubled, &["k"]).unwrap_err();
        assert!(matches!(err, EtlError::DuplicateKey(_)));
        Ok(())
    }

    #[test]
    fn world_stats_cleanup() -> Result<(), Box<dyn Error>> {
        let raw = parse_html_table(fixtures::WORLD_HTML, "http://test")?;
        let frame = normalize_world_stats(raw)?;
        assert_eq!(
            frame.labels(),
            vec![
                "country_or_dependency",
                "population",
                "yearly_change",
                "net_change",
                "density_pkm",
                "land_area_km",
                "migrants_net",
                "fert_rate",
                "med_age",
                "urban_pop",
                "world_share"
            ]
        );
        assert_eq!(frame.value("population", 0), Some(&Value::Float(38928346.0)));
        assert_eq!(frame.value("yearly_change", 0), Some(&Value::Float(2.33)));
        assert_eq!(frame.value("migrants_net", 0), Some(&Value::Float(-62920.0)));
        let holy_see = frame.value("fert_rate", 1).and_then(|v| v.as_f64()).unwrap();
        assert!(holy_see.is_nan());
        Ok(())
    }

    #[test]
    fn world_stats_rejects_text_in_numeric_columns() -> Result<(), Box<dyn Error>> {
        let html = "<table><tr><th>#</th><th>Country</th><th>Population</th></tr>\
                    <tr><td>1</td><td>Peru</td><td>lots</td></tr></table>";
        let raw = parse_html_table(html, "http://test")?;
        // first column after the rank must be the country name
        assert!(matches!(normalize_world_stats(raw.clone()), Err(EtlError::Schema(_))));

        let html = "<table><tr><th>#</th><th>Country (or dependency)</th><th>Population</th></tr>\
                    <tr><td>1</td><td>Peru</td><td>lots</td></tr></table>";
        let raw = parse_html_table(html, "http://test")?;
        let err = normalize_world_stats(raw).unwrap_err();
        assert!(matches!(err, EtlError::NotNumeric { ref value, .. } if value == "lots"));
        Ok(())
    }
}
