use crate::config;
use crate::job;

pub struct State {
	pub config: config::Config,
	pub job_set: job::JobSet,
	pub last_status: u8,
}

impl State {
	pub fn new(config: config::Config) -> State {
		State { config, job_set: job::JobSet::new(), last_status: 0 }
	}
}
