use mediautil_core::config::{CoreConfig, ENV_COMMAND_TIMEOUT, ENV_FFPROBE};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

// Everything touching the environment lives in one test so parallel test
// threads never observe each other's variables.
#[test]
fn test_env_var_overrides() {
    // SAFETY: no other test in this binary reads or writes the environment.
    unsafe {
        env::remove_var(ENV_FFPROBE);
        env::remove_var(ENV_COMMAND_TIMEOUT);
    }
    assert_eq!(CoreConfig::from_env(), CoreConfig::default());

    unsafe {
        env::set_var(ENV_FFPROBE, "/opt/ffmpeg/bin/ffprobe");
        env::set_var(ENV_COMMAND_TIMEOUT, "45");
    }
    let config = CoreConfig::from_env();
    assert_eq!(config.ffprobe_path, PathBuf::from("/opt/ffmpeg/bin/ffprobe"));
    assert_eq!(config.command_timeout, Some(Duration::from_secs(45)));

    // Invalid timeouts are ignored rather than fatal.
    unsafe {
        env::set_var(ENV_COMMAND_TIMEOUT, "forever");
    }
    assert_eq!(CoreConfig::from_env().command_timeout, None);

    unsafe {
        env::set_var(ENV_COMMAND_TIMEOUT, "1e30");
    }
    assert_eq!(CoreConfig::from_env().command_timeout, None);

    unsafe {
        env::remove_var(ENV_FFPROBE);
        env::remove_var(ENV_COMMAND_TIMEOUT);
    }
}
