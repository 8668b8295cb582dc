mod test_dispatch;
mod test_frames;
mod test_globals;
mod utils;
