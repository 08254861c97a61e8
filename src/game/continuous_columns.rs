use chrono::{Days, NaiveDate, NaiveTime};
use rand::Rng;

use super::sampling::{local_range, sample_range_sorted, sample_sorted};
use crate::error::Result;

const FIRST_NAMES: [&str; 40] = [
    "Ada", "Bastian", "Cleo", "Dorian", "Elsie", "Fenwick", "Greta", "Hollis", "Ines", "Jasper",
    "Kaia", "Lowell", "Mira", "Nico", "Odette", "Percy", "Quinn", "Rosalind", "Silas", "Tamsin",
    "Ulric", "Vesna", "Wendell", "Xiomara", "Yusuf", "Zelda", "Anouk", "Bram", "Corin", "Delphine",
    "Emrys", "Flora", "Gideon", "Hazel", "Ivo", "Juno", "Kit", "Linnea", "Marek", "Noor",
];

const LAST_NAMES: [&str; 30] = [
    "Abernathy", "Blackwood", "Castellano", "Drummond", "Eastwick", "Fairbanks", "Gallagher",
    "Holloway", "Ingram", "Jablonski", "Kettering", "Lindqvist", "Marchetti", "Northcott",
    "Okonkwo", "Pemberton", "Quillfeather", "Ravensworth", "Sorensen", "Thackeray", "Underhill",
    "Vasquez", "Whitlock", "Yardley", "Zamora", "Achterberg", "Bellweather", "Crane", "Dunmore",
    "Everly",
];

const BYTE_UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
/// 1.0 through 1023.9 of a unit, in tenths.
const BYTE_TENTHS_PER_UNIT: u64 = 10230;

/// 1.0000 through 9.9999, in units of 1e-4.
const DURATION_MANTISSAS: u64 = 90000;
const DURATION_MIN_EXPONENT: u64 = 2;
const DURATION_MAX_EXPONENT: u64 = 7;

const DATE_WINDOW_DAYS: i64 = 365 * 2;
const SECONDS_PER_DAY: i64 = 60 * 60 * 24;

/// Column types whose values have a total order.
///
/// Every generator draws distinct values and emits them ascending. The
/// rendered strings keep that order, so a rule like `price <= $41.00` agrees
/// with the row positions the constraint math works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContinuousColumn {
    Age,
    Quantity,
    Date,
    Price,
    PostalCode,
    Time,
    Name,
    Bytes,
    Coordinate,
    Duration,
    Id,
}

impl ContinuousColumn {
    pub fn all() -> Vec<ContinuousColumn> {
        vec![
            ContinuousColumn::Age,
            ContinuousColumn::Quantity,
            ContinuousColumn::Date,
            ContinuousColumn::Price,
            ContinuousColumn::PostalCode,
            ContinuousColumn::Time,
            ContinuousColumn::Name,
            ContinuousColumn::Bytes,
            ContinuousColumn::Coordinate,
            ContinuousColumn::Duration,
            ContinuousColumn::Id,
        ]
    }

    pub fn names(&self) -> &'static [&'static str] {
        match self {
            ContinuousColumn::Age => &["age"],
            ContinuousColumn::Quantity => &["quantity", "amount"],
            ContinuousColumn::Date => &[
                "date",
                "start_date",
                "end_date",
                "enroll_date",
                "apply_date",
                "exp_date",
            ],
            ContinuousColumn::Price => &["price", "cost", "revenue", "profit", "valuation"],
            ContinuousColumn::PostalCode => &["zip_code", "postal_code", "post_code"],
            ContinuousColumn::Time => &["time", "start_time", "end_time", "timestamp"],
            ContinuousColumn::Name => &["name", "full_name"],
            ContinuousColumn::Bytes => &["bytes", "size", "capacity", "space", "storage"],
            ContinuousColumn::Coordinate => &["latitude", "longitude"],
            ContinuousColumn::Duration => &["duration", "seconds", "elapsed_time"],
            ContinuousColumn::Id => &["id", "key"],
        }
    }

    pub fn generate_rows<R: Rng + ?Sized>(&self, rng: &mut R, rows: usize) -> Result<Vec<String>> {
        match self {
            ContinuousColumn::Age => Ok(sample_range_sorted(rng, 0, 90, rows)?
                .into_iter()
                .map(|age| age.to_string())
                .collect()),
            ContinuousColumn::Quantity => {
                let (start, end) = local_range(rng, 0, 1000, 100, 100);
                Ok(sample_range_sorted(rng, start, end, rows)?
                    .into_iter()
                    .map(|quantity| quantity.to_string())
                    .collect())
            }
            ContinuousColumn::Date => {
                let first = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap_or_default();
                let last = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap_or_default();
                let span = (last - first).num_days();
                let window_start = rng.random_range(0..=span - DATE_WINDOW_DAYS);
                Ok(sample_range_sorted(
                    rng,
                    window_start,
                    window_start + DATE_WINDOW_DAYS,
                    rows,
                )?
                .into_iter()
                .map(|day| (first + Days::new(day as u64)).format("%Y-%m-%d").to_string())
                .collect())
            }
            ContinuousColumn::Price => {
                let (start, end) = local_range(rng, 1, 10000, 1000, 10000);
                Ok(sample_range_sorted(rng, start * 100, end * 100, rows)?
                    .into_iter()
                    .map(|cents| format!("${}.{:02}", cents / 100, cents % 100))
                    .collect())
            }
            ContinuousColumn::PostalCode => Ok(sample_range_sorted(rng, 0, 99999, rows)?
                .into_iter()
                .map(|code| format!("{:05}", code))
                .collect()),
            ContinuousColumn::Time => {
                let (start, end) = local_range(rng, 0, SECONDS_PER_DAY, 60 * 60, SECONDS_PER_DAY);
                Ok(sample_range_sorted(rng, start, end, rows)?
                    .into_iter()
                    .map(|seconds| {
                        NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0)
                            .unwrap_or_default()
                            .format("%H:%M:%S")
                            .to_string()
                    })
                    .collect())
            }
            ContinuousColumn::Name => {
                let combinations = (FIRST_NAMES.len() * LAST_NAMES.len()) as u64;
                let mut names: Vec<String> = sample_sorted(rng, combinations, rows)?
                    .into_iter()
                    .map(|i| {
                        let first = FIRST_NAMES[i as usize / LAST_NAMES.len()];
                        let last = LAST_NAMES[i as usize % LAST_NAMES.len()];
                        format!("{} {}", first, last)
                    })
                    .collect();
                names.sort();
                Ok(names)
            }
            ContinuousColumn::Bytes => {
                // Sampled at display precision so that no two rows render alike.
                // The last slot is exactly 1 TiB.
                let slots = BYTE_TENTHS_PER_UNIT * 3 + 1;
                Ok(sample_sorted(rng, slots, rows)?
                    .into_iter()
                    .map(|slot| {
                        let unit = (slot / BYTE_TENTHS_PER_UNIT) as usize;
                        let tenths = 10 + slot % BYTE_TENTHS_PER_UNIT;
                        format!("{}.{}{}", tenths / 10, tenths % 10, BYTE_UNITS[unit])
                    })
                    .collect())
            }
            ContinuousColumn::Coordinate => {
                let (start, end) = local_range(rng, -90, 90, 30, 180);
                Ok(sample_range_sorted(rng, start * 10000, end * 10000, rows)?
                    .into_iter()
                    .map(|v| {
                        let sign = if v < 0 { "-" } else { "" };
                        format!("{}{}.{:04}", sign, v.abs() / 10000, v.abs() % 10000)
                    })
                    .collect())
            }
            ContinuousColumn::Duration => {
                let exponents = DURATION_MAX_EXPONENT - DURATION_MIN_EXPONENT + 1;
                Ok(sample_sorted(rng, DURATION_MANTISSAS * exponents, rows)?
                    .into_iter()
                    .map(|slot| {
                        let exponent = DURATION_MIN_EXPONENT + slot / DURATION_MANTISSAS;
                        let mantissa = 10000 + slot % DURATION_MANTISSAS;
                        format!("{}.{:04}e{}", mantissa / 10000, mantissa % 10000, exponent)
                    })
                    .collect())
            }
            ContinuousColumn::Id => Ok(sample_sorted(rng, 0xffff_ffff, rows)?
                .into_iter()
                .map(|id| format!("{:08x}", id))
                .collect()),
        }
    }
}
