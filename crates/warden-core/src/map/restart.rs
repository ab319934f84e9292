use crate::policy::RestartPolicy;
use warden_model::RestartStrategy;

pub fn to_restart_policy(s: RestartStrategy) -> RestartPolicy {
    match s {
        RestartStrategy::OnFailure => RestartPolicy::OnFailure,
        RestartStrategy::Always => RestartPolicy::Always,
        RestartStrategy::Never => RestartPolicy::Never,
    }
}
