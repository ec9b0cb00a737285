// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

#[cfg(test)]
mod tests {
    use pam_slurm_drained::{
        account::check_account,
        node_state::{BaseState, NodeState},
        pam::{PamReturn, Severity, PAM_SILENT},
        report::denial_message,
        test_env::*,
    };

    const NO_ARGS: [&str; 0] = [];

    fn state(base: BaseState, flags: NodeState) -> u32 {
        NodeState::new(base, flags).bits()
    }

    /// Run a check for `user` on `node07` against `slurm`.
    fn check(host: &FakeHost, slurm: &FakeSlurm, flags: i32, args: &[&str]) -> PamReturn {
        check_account(host, slurm, &FakeHostname::new("node07"), flags, args)
    }

    #[test]
    fn drained_node_allows() {
        let host = FakeHost::new(Some("alice"));
        let slurm = FakeSlurm::with_state(state(BaseState::Idle, NodeState::DRAIN));

        assert_eq!(check(&host, &slurm, 0, &NO_ARGS), PamReturn::Success);

        assert_eq!(
            host.logs(),
            vec![(
                Severity::Info,
                "Node node07 is drained, allowing access".to_string()
            )]
        );
        assert!(host.messages().is_empty());
        assert_eq!(*slurm.queried.borrow(), vec!["node07".to_string()]);
        assert_eq!(slurm.init_count(), 1);
        assert_eq!(slurm.destroy_count(), 1);
        assert_eq!(slurm.outstanding_responses(), 0);
    }

    #[test]
    fn allocated_node_denies_and_tells_user() {
        let host = FakeHost::new(Some("alice"));
        let slurm = FakeSlurm::with_state(state(BaseState::Allocated, NodeState::empty()));

        assert_eq!(check(&host, &slurm, 0, &NO_ARGS), PamReturn::PermDenied);

        assert_eq!(
            host.logs(),
            vec![(Severity::Notice, "Node node07 is not draining".to_string())]
        );
        assert_eq!(
            host.messages(),
            vec![
                "Access denied by pam_slurm_drained: Node node07 is not draining".to_string()
            ]
        );
        assert_eq!(slurm.destroy_count(), 1);
    }

    #[test]
    fn silent_denial_sends_no_message() {
        let host = FakeHost::new(Some("alice"));
        let slurm = FakeSlurm::with_state(state(BaseState::Allocated, NodeState::empty()));

        assert_eq!(check(&host, &slurm, PAM_SILENT, &NO_ARGS), PamReturn::PermDenied);

        assert_eq!(host.logs_at(Severity::Notice).len(), 1);
        assert!(host.messages().is_empty());
    }

    #[test]
    fn draining_mixed_node_is_not_drained_yet() {
        let host = FakeHost::new(Some("alice"));
        let slurm = FakeSlurm::with_state(state(BaseState::Mixed, NodeState::DRAIN));

        assert_eq!(check(&host, &slurm, 0, &NO_ARGS), PamReturn::PermDenied);

        assert_eq!(
            host.logs_at(Severity::Notice),
            vec!["Host node07 is not drained yet".to_string()]
        );
        assert_eq!(
            host.messages(),
            vec![denial_message("Host node07 is not drained yet")]
        );
    }

    #[test]
    fn failed_conversation_keeps_denial() {
        let host = FakeHost::new(Some("alice")).with_failing_conversation();
        let slurm = FakeSlurm::with_state(state(BaseState::Mixed, NodeState::DRAIN));

        assert_eq!(check(&host, &slurm, 0, &NO_ARGS), PamReturn::PermDenied);
        assert_eq!(host.logs().len(), 1);
    }

    #[test]
    fn root_skips_slurm_entirely() {
        let host = FakeHost::new(Some("root"));
        let slurm = FakeSlurm::new(NodeReply::Error(1008));

        assert_eq!(check(&host, &slurm, 0, &NO_ARGS), PamReturn::Ignore);

        assert_eq!(
            host.logs(),
            vec![(Severity::Info, "Ignoring root user".to_string())]
        );
        assert_eq!(slurm.init_count(), 0);
        assert_eq!(slurm.destroy_count(), 0);
        assert!(slurm.queried.borrow().is_empty());
    }

    #[test]
    fn root_is_checked_with_ignore_root_off() {
        let host = FakeHost::new(Some("root"));
        let slurm = FakeSlurm::with_state(state(BaseState::Idle, NodeState::empty()));

        assert_eq!(
            check(&host, &slurm, 0, &["ignore_root=0"]),
            PamReturn::PermDenied
        );
        assert_eq!(slurm.destroy_count(), 1);
    }

    #[test]
    fn no_user_is_checked() {
        let host = FakeHost::new(None);
        let slurm = FakeSlurm::with_state(state(BaseState::Down, NodeState::DRAIN));

        assert_eq!(check(&host, &slurm, 0, &NO_ARGS), PamReturn::Success);
    }

    #[test]
    fn slurm_conf_is_passed_to_slurm() {
        let host = FakeHost::new(Some("alice"));
        let slurm = FakeSlurm::with_state(state(BaseState::Idle, NodeState::DRAIN));

        check(&host, &slurm, 0, &["slurm_conf=/x/y.conf", "bogus=1"]);

        assert_eq!(
            *slurm.init_calls.borrow(),
            vec![Some("/x/y.conf".to_string())]
        );
        assert_eq!(
            host.logs_at(Severity::Warning),
            vec!["unknown option: bogus=1".to_string()]
        );
    }

    /// Each failure is a system error, logged once, and the session is still torn down.
    fn assert_system_error(slurm: FakeSlurm, hostname: FakeHostname, reason: &str) {
        let host = FakeHost::new(Some("alice"));

        let result = check_account(&host, &slurm, &hostname, 0, &NO_ARGS);

        assert_eq!(result, PamReturn::SystemErr);
        assert_eq!(host.logs(), vec![(Severity::Error, reason.to_string())]);
        assert!(host.messages().is_empty());
        assert_eq!(slurm.init_count(), 1);
        assert_eq!(slurm.destroy_count(), 1);
        assert_eq!(slurm.outstanding_responses(), 0);
    }

    #[test]
    fn zero_records_is_system_error() {
        assert_system_error(
            FakeSlurm::new(NodeReply::Records(vec![])),
            FakeHostname::new("node07"),
            "Can't find node07 in cluster",
        );
    }

    #[test]
    fn load_error_is_system_error() {
        assert_system_error(
            FakeSlurm::new(NodeReply::Error(1008)),
            FakeHostname::new("node07"),
            "Failed to load node information from Slurm: Unable to contact slurm controller (connect failure) (1008)",
        );
    }

    #[test]
    fn empty_response_is_system_error() {
        assert_system_error(
            FakeSlurm::new(NodeReply::Empty),
            FakeHostname::new("node07"),
            "Can't get node info",
        );
    }

    #[test]
    fn hostname_failure_is_system_error() {
        assert_system_error(
            FakeSlurm::with_state(state(BaseState::Idle, NodeState::DRAIN)),
            FakeHostname::failing(),
            "Failed to get hostname",
        );
    }

    #[test]
    fn first_record_wins() {
        let host = FakeHost::new(Some("alice"));
        let slurm = FakeSlurm::new(NodeReply::Records(vec![
            state(BaseState::Idle, NodeState::DRAIN),
            state(BaseState::Allocated, NodeState::empty()),
        ]));

        assert_eq!(check(&host, &slurm, 0, &NO_ARGS), PamReturn::Success);
        assert_eq!(slurm.outstanding_responses(), 0);
    }

    #[test]
    fn already_initialized_config_is_left_alone() {
        let host = FakeHost::new(Some("alice"));
        let slurm =
            FakeSlurm::with_state(state(BaseState::Idle, NodeState::DRAIN)).already_initialized();

        assert_eq!(check(&host, &slurm, 0, &NO_ARGS), PamReturn::Success);

        assert_eq!(slurm.destroy_count(), 0);
        assert_eq!(host.logs_at(Severity::Warning).len(), 1);
        assert_eq!(host.logs_at(Severity::Info).len(), 1);
    }
}
