//! `hashrev hash` — print file fingerprints.

use hashrev_common::Fingerprint;

use crate::{GlobalArgs, HashArgs};

/// Runs the `hashrev hash` command.
///
/// Prints `<fingerprint>  <path>` for each file to stdout. Returns exit code
/// 0 when every file was read, 1 otherwise.
pub fn run(args: &HashArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut code = 0;
    for path in &args.files {
        match std::fs::read(path) {
            Ok(bytes) => println!("{}  {}", Fingerprint::from_bytes(&bytes), path.display()),
            Err(e) => {
                eprintln!("error: {}: {e}", path.display());
                code = 1;
            }
        }
    }
    Ok(code)
}
