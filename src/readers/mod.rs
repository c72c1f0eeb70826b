pub mod csv_rows;
pub mod history_catalog;
pub mod station_info_reader;
pub mod value_reader;

pub use history_catalog::read_history_catalog;
pub use station_info_reader::StationInfoReader;
pub use value_reader::ValueFileReader;
