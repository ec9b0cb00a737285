// SPDX-License-Identifier: MIT
// Copyright 2025. Triad National Security, LLC.

#[cfg(test)]
mod tests {
    use pam_slurm_drained::{options::Options, pam::Severity, test_env::FakeHost};

    #[test]
    fn defaults() {
        let host = FakeHost::new(None);
        let options = Options::parse::<&str>(&[], &host);

        assert_eq!(options, Options::default());
        assert_eq!(options.slurm_conf, None);
        assert!(options.ignore_root);
        assert!(host.logs().is_empty());
    }

    #[test]
    fn known_and_unknown_options() {
        let host = FakeHost::new(None);
        let options = Options::parse(&["slurm_conf=/x/y.conf", "ignore_root=0", "bogus=1"], &host);

        assert_eq!(
            options,
            Options {
                slurm_conf: Some("/x/y.conf".to_string()),
                ignore_root: false,
            }
        );
        assert_eq!(
            host.logs(),
            vec![(Severity::Warning, "unknown option: bogus=1".to_string())]
        );
    }

    #[test]
    fn keys_are_case_insensitive() {
        let host = FakeHost::new(None);
        let options = Options::parse(&["SLURM_CONF=/etc/Slurm.conf", "Ignore_Root=0"], &host);

        assert_eq!(options.slurm_conf.as_deref(), Some("/etc/Slurm.conf"));
        assert!(!options.ignore_root);
        assert!(host.logs().is_empty());
    }

    #[test]
    fn ignore_root_only_disabled_by_zero() {
        let host = FakeHost::new(None);
        for value in ["ignore_root=1", "ignore_root=", "ignore_root=no", "ignore_root=00"] {
            assert!(Options::parse(&[value], &host).ignore_root, "{value}");
        }
        assert!(host.logs().is_empty());
    }

    #[test]
    fn empty_slurm_conf_is_kept() {
        let host = FakeHost::new(None);
        let options = Options::parse(&["slurm_conf="], &host);
        assert_eq!(options.slurm_conf.as_deref(), Some(""));
    }

    #[test]
    fn bare_keys_are_unknown() {
        let host = FakeHost::new(None);
        let options = Options::parse(&["slurm_conf", "ignore_root", "debug"], &host);

        assert_eq!(options, Options::default());
        assert_eq!(host.logs_at(Severity::Warning).len(), 3);
    }

    #[test]
    fn later_slurm_conf_wins() {
        let host = FakeHost::new(None);
        let options = Options::parse(&["slurm_conf=/a", "slurm_conf=/b"], &host);
        assert_eq!(options.slurm_conf.as_deref(), Some("/b"));
    }
}
