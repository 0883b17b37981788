use snafu::Snafu;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum SchedulerError {
    #[snafu(display("{input:?} is neither a quality label nor a number"))]
    UnknownQuality { input: String },
    #[snafu(display("{input:?} is not a YYYY-MM-DD date"))]
    InvalidDate {
        input: String,
        source: chrono::ParseError,
    },
    #[snafu(display("invalid scheduler config: {reason}"))]
    InvalidConfig { reason: String },
}

pub type Result<T, E = SchedulerError> = std::result::Result<T, E>;
