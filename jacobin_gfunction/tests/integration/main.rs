mod test_big_numbers;
mod test_clinit_race;
mod test_formatter;
mod test_streams;
mod utils;
