use cadenza_derive::cadenza_error;

#[cadenza_error]
pub enum DemoError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
}

fn main() {}
