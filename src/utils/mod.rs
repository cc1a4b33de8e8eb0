pub mod fps_counter;
