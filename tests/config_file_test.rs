//! conan.conf file tests
//!
//! Edits go through the real file system and are read back from disk.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use conan_conf::config::{ClientConfig, ConfigError, ConfigFile, ConfigPath, MapEnv};
use tempfile::{tempdir, TempDir};

const USER_CONF: &str = "\
# Managed by hand
[log]
level = info        # environment CONAN_LOGGING_LEVEL
print_run_commands = True

[general]
default_profile = default
; cpu_count = 4
parallel_download = 8

[proxies]
http = http://10.10.1.10:3128
    special.com = http://other:8080
https = None
no_proxy_match = *bintray.com*, https://myserver.*

[hooks]
attribute_checker
";

fn write_conf(text: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("conan.conf");
    fs::write(&path, text).expect("Failed to write config file");
    (dir, path)
}

fn path(text: &str) -> ConfigPath {
    ConfigPath::parse(text).expect("Invalid path")
}

#[test]
fn test_unmodified_file_round_trips() {
    let (_dir, conf) = write_conf(USER_CONF);

    let file = ConfigFile::open(&conf).expect("Failed to open config file");
    assert_eq!(file.dump(), USER_CONF);
}

#[test]
fn test_set_keeps_comments_and_layout() {
    let (_dir, conf) = write_conf(USER_CONF);

    let mut file = ConfigFile::open(&conf).expect("Failed to open config file");
    file.set(&path("general.parallel_download"), "2").unwrap();
    file.set(&path("general.request_timeout"), "60").unwrap();

    let written = fs::read_to_string(&conf).unwrap();
    assert!(written.starts_with("# Managed by hand\n[log]\nlevel = info        # environment CONAN_LOGGING_LEVEL\n"));
    assert!(written.contains("; cpu_count = 4\nparallel_download = 2\nrequest_timeout = 60\n\n[proxies]\n"));
    assert!(written.contains("    special.com = http://other:8080\n"));

    let reopened = ConfigFile::open(&conf).unwrap();
    assert_eq!(reopened.get(&path("general.parallel_download")).unwrap(), "2");
    assert_eq!(reopened.get(&path("general.request_timeout")).unwrap(), "60");
    assert_eq!(reopened.get(&path("log.level")).unwrap(), "info");
}

#[test]
fn test_set_creates_missing_file_and_section() {
    let dir = tempdir().unwrap();
    let conf = dir.path().join(".conan").join("conan.conf");

    let mut file = ConfigFile::open(&conf).expect("A missing file opens empty");
    assert!(file.store().is_empty());

    file.set(&path("storage.path"), "./data").unwrap();
    assert_eq!(fs::read_to_string(&conf).unwrap(), "[storage]\npath = ./data\n");
}

#[test]
fn test_remove_key_and_section() {
    let (_dir, conf) = write_conf(USER_CONF);

    let mut file = ConfigFile::open(&conf).unwrap();
    file.remove(&path("log.print_run_commands")).unwrap();
    file.remove(&path("proxies")).unwrap();

    let reopened = ConfigFile::open(&conf).unwrap();
    assert_eq!(
        reopened.get(&path("log.print_run_commands")),
        Err(ConfigError::MissingKey {
            section: "log".to_string(),
            key: "print_run_commands".to_string()
        })
    );
    assert_eq!(
        reopened.get(&path("proxies.http")),
        Err(ConfigError::MissingSection("proxies".to_string()))
    );
    assert_eq!(reopened.get(&path("hooks")).unwrap(), "attribute_checker");

    let mut file = reopened;
    assert_eq!(
        file.remove(&path("log.missing")),
        Err(ConfigError::MissingKey {
            section: "log".to_string(),
            key: "missing".to_string()
        })
    );
}

#[test]
fn test_percent_survives_a_write() {
    let (_dir, conf) = write_conf("[general]\n");

    let mut file = ConfigFile::open(&conf).unwrap();
    file.set(&path("general.pattern"), "100%_done").unwrap();
    assert_eq!(fs::read_to_string(&conf).unwrap(), "[general]\npattern = 100%%_done\n");

    let reopened = ConfigFile::open(&conf).unwrap();
    assert_eq!(reopened.get(&path("general.pattern")).unwrap(), "100%_done");
}

#[test]
fn test_multi_line_value_survives_a_write() {
    let (_dir, conf) = write_conf("[proxies]\n");

    let mut file = ConfigFile::open(&conf).unwrap();
    file.set(&path("proxies.http"), "\nhost.com = http://proxy:1\nother.com = http://proxy:2")
        .unwrap();

    let reopened = ConfigFile::open(&conf).unwrap();
    let proxies = ClientConfig::new(reopened, Box::new(MapEnv::new()))
        .proxies()
        .expect("The [proxies] section exists");
    assert_eq!(proxies.get("http://host.com"), Some(Some("http://proxy:1")));
    assert_eq!(proxies.get("http://other.com"), Some(Some("http://proxy:2")));
}

#[test]
fn test_malformed_file_is_a_format_error() {
    let (_dir, conf) = write_conf("level = info\n[log]\n");

    match ConfigFile::open(&conf) {
        Err(ConfigError::Format { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected a format error, got {:?}", other),
    }
}

#[test]
fn test_client_settings_from_file() {
    let (_dir, conf) = write_conf(USER_CONF);

    let file = ConfigFile::open(&conf).unwrap();
    let mut config = ClientConfig::new(file, Box::new(MapEnv::new()));
    let settings = config.settings().unwrap();

    assert!(settings.print_commands_to_output);
    assert_eq!(settings.parallel_download, Some(8));
    assert_eq!(settings.hooks, vec!["attribute_checker"]);
    assert_eq!(settings.config_install_interval, None);

    let proxies = settings.proxies.expect("The [proxies] section exists");
    assert_eq!(proxies.get("http"), Some(Some("http://10.10.1.10:3128")));
    assert_eq!(proxies.get("http://special.com"), Some(Some("http://other:8080")));
    assert_eq!(proxies.get("https"), Some(None));
    assert_eq!(proxies.no_proxy_match(), vec!["*bintray.com*", "https://myserver.*"]);
}

#[test]
fn test_bad_install_interval_is_removed_from_disk() {
    let (_dir, conf) = write_conf("[general]\nconfig_install_interval = 3 days\nparallel_download = 1\n");

    let file = ConfigFile::open(&conf).unwrap();
    let mut config = ClientConfig::new(file, Box::new(MapEnv::new()));
    assert!(matches!(
        config.config_install_interval(),
        Err(ConfigError::InvalidConfig(_))
    ));
    assert_eq!(fs::read_to_string(&conf).unwrap(), "[general]\nparallel_download = 1\n");

    config
        .file_mut()
        .set(&path("general.config_install_interval"), "2w")
        .unwrap();
    assert_eq!(
        config.config_install_interval(),
        Ok(Some(Duration::from_secs(2 * 7 * 24 * 3600)))
    );
}

#[test]
fn test_rejected_edits_leave_the_file_readable() {
    let (_dir, conf) = write_conf("[general]\na = 1\n");

    let mut file = ConfigFile::open(&conf).unwrap();
    assert!(matches!(
        file.set(&ConfigPath::key("general", "[x"), "1"),
        Err(ConfigError::InvalidPath(_))
    ));
    assert!(matches!(
        file.set(&ConfigPath::key("general", " indented"), "2"),
        Err(ConfigError::InvalidPath(_))
    ));
    assert!(matches!(
        file.set(&path("proxies.http"), "http://a:1\n#tag"),
        Err(ConfigError::InvalidConfig(_))
    ));
    assert!(matches!(ConfigPath::parse("general.#hidden"), Err(ConfigError::InvalidPath(_))));

    assert_eq!(fs::read_to_string(&conf).unwrap(), "[general]\na = 1\n");
    let reopened = ConfigFile::open(&conf).expect("The file stays parseable");
    assert_eq!(reopened.get(&path("general.a")).unwrap(), "1");
}

#[test]
fn test_crlf_file_keeps_its_line_endings() {
    let (_dir, conf) = write_conf("[log]\r\nlevel = info\r\n");

    let mut file = ConfigFile::open(&conf).unwrap();
    file.set(&path("log.print_run_commands"), "True").unwrap();

    let written = fs::read_to_string(&conf).unwrap();
    assert_eq!(written, "[log]\r\nlevel = info\r\nprint_run_commands = True\r\n");
    assert_eq!(written.matches('\n').count(), written.matches("\r\n").count());
}
