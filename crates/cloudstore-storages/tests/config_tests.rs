//! Tests for loading storage configuration from the environment.

use cloudstore_storages::{BackendType, StorageConfig, StorageError};
use rstest::rstest;
use serial_test::serial;

const ALL_VARS: &[&str] = &[
	"STORAGE_BACKEND",
	"S3_REGION",
	"S3_ACCESS_KEY_ID",
	"S3_SECRET_ACCESS_KEY",
	"S3_SESSION_TOKEN",
	"S3_ENDPOINT",
	"GCS_PROJECT_ID",
	"GCS_CREDENTIALS_FILE",
	"GCS_PUBLIC",
	"GCS_ENDPOINT",
	"LOCAL_ROOT",
];

/// Reset the storage variables, then apply `vars`.
fn set_env(vars: &[(&str, &str)]) {
	// SAFETY: every test touching these variables is #[serial].
	unsafe {
		for name in ALL_VARS {
			std::env::remove_var(name);
		}
		for (name, value) in vars {
			std::env::set_var(name, value);
		}
	}
}

#[rstest]
#[serial(env)]
fn test_missing_backend_variable() {
	set_env(&[]);

	let result = StorageConfig::from_env();
	assert!(
		matches!(result, Err(StorageError::ConfigError(ref m)) if m.contains("STORAGE_BACKEND"))
	);
}

#[rstest]
#[serial(env)]
fn test_unknown_backend() {
	set_env(&[("STORAGE_BACKEND", "azure")]);

	let result = StorageConfig::from_env();
	assert!(matches!(result, Err(StorageError::ConfigError(_))));
}

#[cfg(feature = "local")]
#[rstest]
#[serial(env)]
fn test_local_from_env() {
	set_env(&[("STORAGE_BACKEND", "local"), ("LOCAL_ROOT", "/srv/buckets")]);

	let config = StorageConfig::from_env().unwrap();
	assert_eq!(config.backend_type(), BackendType::Local);
	match config {
		StorageConfig::Local(local) => {
			assert_eq!(local.root, std::path::PathBuf::from("/srv/buckets"));
		}
		#[allow(unreachable_patterns)]
		other => panic!("Expected local config, got {:?}", other),
	}
}

#[cfg(feature = "local")]
#[rstest]
#[serial(env)]
fn test_local_requires_root() {
	set_env(&[("STORAGE_BACKEND", "Local")]);

	let result = StorageConfig::from_env();
	assert!(matches!(result, Err(StorageError::ConfigError(ref m)) if m.contains("LOCAL_ROOT")));
}

#[cfg(feature = "s3")]
#[rstest]
#[serial(env)]
fn test_s3_from_env() {
	set_env(&[
		("STORAGE_BACKEND", "S3"),
		("S3_REGION", "eu-west-1"),
		("S3_ACCESS_KEY_ID", "AKIDEXAMPLE"),
		("S3_SECRET_ACCESS_KEY", "secret"),
		("S3_ENDPOINT", "http://localhost:4566/"),
	]);

	let config = StorageConfig::from_env().unwrap();
	match config {
		StorageConfig::S3(s3) => {
			assert_eq!(s3.region, "eu-west-1");
			assert_eq!(s3.access_key_id, "AKIDEXAMPLE");
			assert_eq!(s3.session_token, None);
			assert_eq!(s3.endpoint.as_deref(), Some("http://localhost:4566"));
			assert!(s3.force_path_style);
		}
		#[allow(unreachable_patterns)]
		other => panic!("Expected S3 config, got {:?}", other),
	}
}

#[cfg(feature = "s3")]
#[rstest]
#[case("S3_REGION")]
#[case("S3_ACCESS_KEY_ID")]
#[case("S3_SECRET_ACCESS_KEY")]
#[serial(env)]
fn test_s3_requires_variable(#[case] missing: &str) {
	let vars: Vec<(&str, &str)> = [
		("STORAGE_BACKEND", "s3"),
		("S3_REGION", "us-east-1"),
		("S3_ACCESS_KEY_ID", "AKIDEXAMPLE"),
		("S3_SECRET_ACCESS_KEY", "secret"),
	]
	.into_iter()
	.filter(|(name, _)| *name != missing)
	.collect();
	set_env(&vars);

	let result = StorageConfig::from_env();
	assert!(matches!(result, Err(StorageError::ConfigError(ref m)) if m.contains(missing)));
}

#[cfg(feature = "gcs")]
#[rstest]
#[serial(env)]
fn test_gcs_from_env() {
	set_env(&[
		("STORAGE_BACKEND", "gcs"),
		("GCS_PROJECT_ID", "my-project"),
		("GCS_PUBLIC", "true"),
	]);

	let config = StorageConfig::from_env().unwrap();
	match config {
		StorageConfig::Gcs(gcs) => {
			assert_eq!(gcs.project_id, "my-project");
			assert!(gcs.public);
			assert!(gcs.credentials_file.is_none());
		}
		#[allow(unreachable_patterns)]
		other => panic!("Expected GCS config, got {:?}", other),
	}
}

#[cfg(feature = "gcs")]
#[rstest]
#[serial(env)]
fn test_gcs_rejects_bad_public_flag() {
	set_env(&[
		("STORAGE_BACKEND", "gcs"),
		("GCS_PROJECT_ID", "my-project"),
		("GCS_PUBLIC", "yes"),
	]);

	let result = StorageConfig::from_env();
	assert!(matches!(result, Err(StorageError::ConfigError(ref m)) if m.contains("GCS_PUBLIC")));
}
