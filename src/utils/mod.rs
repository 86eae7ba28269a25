mod time;

pub use time::date_stamp;

/// Random 21-character id.
pub fn longid() -> String {
    nanoid::nanoid!()
}
