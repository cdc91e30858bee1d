//! Threads. The API takes free-form parameters here.

use crate::params::Params;
use crate::request::{HttpMethod, RequestDescriptor, ResponseShape};

const THREADS: &str = "2.0/accounts/{account_id}/threads";
const THREAD: &str = "2.0/accounts/{account_id}/threads/{thread_id}";

pub fn list(account_id: &str, extra: &Params) -> RequestDescriptor {
    RequestDescriptor::from_template(HttpMethod::Get, THREADS, &[account_id], ResponseShape::Array)
        .with_params(extra)
}

pub fn get(account_id: &str, thread_id: &str, extra: &Params) -> RequestDescriptor {
    RequestDescriptor::from_template(
        HttpMethod::Get,
        THREAD,
        &[account_id, thread_id],
        ResponseShape::Dictionary,
    )
    .with_params(extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_passes_extra_params() {
        let extra: Params = [("limit", "5"), ("source", "0")].into_iter().collect();
        let d = list("acc", &extra);
        assert_eq!(d.path(), "2.0/accounts/acc/threads");
        assert_eq!(d.shape(), ResponseShape::Array);
        assert_eq!(d.params(), &extra);
    }

    #[test]
    fn get_thread() {
        let d = get("acc", "gm-abc", &Params::new());
        assert_eq!(d.method(), HttpMethod::Get);
        assert_eq!(d.path(), "2.0/accounts/acc/threads/gm-abc");
        assert!(d.params().is_empty());
    }
}
