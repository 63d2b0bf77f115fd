use std::io;

use wgpu_glue::{AdapterHandle, Framework};

fn main() {
    let _ = pretty_env_logger::try_init();

    let fw = Framework::from_env();

    let adapter = match fw.enumerate_and_select(&mut io::stdout()) {
        Ok(adapter) => adapter,
        Err(e) => panic!("{}", e),
    };

    let props = adapter
        .properties()
        .prettify()
        .expect("adapter properties are always serializable");
    print!("selected: {}", props);
}
