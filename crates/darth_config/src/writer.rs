//! Serializing projects back to `darth-infra.toml`.
//!
//! Output is canonical: sections and keys are always written in the same
//! order, every optional value that is set is written explicitly, and maps are
//! emitted in key order. Reading the output back yields an equal [`Project`].

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ConfigResult;
use crate::models::{EnvironmentOverride, Project, Service};

/// Schema reference written at the top of every document.
pub const SCHEMA_HEADER: &str = "#:schema darth-infra.schema.json";

/// Writer for configuration documents.
pub struct ConfigWriter;

impl ConfigWriter {
    /// Serialize a project to its canonical document text.
    pub fn dump(project: &Project) -> String {
        let mut doc = TomlDoc::default();

        doc.line(SCHEMA_HEADER);
        doc.blank();
        doc.table("project");
        doc.string("name", project.name());
        doc.string("aws_region", project.aws_region());
        doc.string("vpc_name", project.vpc_name());
        doc.string_list("environments", project.environments());
        if !project.tags().is_empty() {
            doc.blank();
            doc.table("project.tags");
            for (key, value) in project.tags() {
                doc.string(key, value);
            }
        }
        doc.blank();

        for svc in project.services() {
            Self::write_service(&mut doc, svc);
            doc.blank();
        }

        if let Some(rds) = project.rds() {
            doc.table("rds");
            doc.string("database_name", &rds.database_name);
            doc.string("instance_type", &rds.instance_type);
            doc.integer("allocated_storage_gb", rds.allocated_storage_gb);
            doc.string_list("expose_to", &rds.expose_to);
            doc.string("engine_version", &rds.engine_version);
            doc.integer("backup_retention_days", rds.backup_retention_days);
            doc.blank();
        }

        for bucket in project.s3_buckets() {
            doc.array_table("s3_buckets");
            doc.string("name", &bucket.name);
            doc.boolean("public_read", bucket.public_read);
            doc.boolean("cloudfront", bucket.cloudfront);
            doc.boolean("cors", bucket.cors);
            doc.blank();
        }

        let alb = project.alb();
        doc.table("alb");
        doc.string("mode", alb.mode.as_str());
        doc.string("shared_alb_name", &alb.shared_alb_name);
        if let Some(arn) = &alb.certificate_arn {
            doc.string("certificate_arn", arn);
        }
        doc.blank();

        for secret in project.secrets() {
            doc.array_table("secrets");
            doc.string("name", &secret.name);
            doc.string("source", secret.source.as_str());
            doc.integer("length", secret.length);
            doc.boolean("generate_once", secret.generate_once);
            doc.blank();
        }

        for (env, overrides) in project.environment_overrides() {
            Self::write_override(&mut doc, env, overrides);
            doc.blank();
        }

        doc.finish()
    }

    /// Write the canonical document to `path`.
    pub fn save(project: &Project, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        debug!("Writing configuration to {:?}", path);
        fs::write(path, Self::dump(project))?;
        Ok(())
    }

    fn write_service(doc: &mut TomlDoc, svc: &Service) {
        doc.array_table("services");
        doc.string("name", &svc.name);
        doc.string("dockerfile", &svc.dockerfile);
        doc.string("build_context", &svc.build_context);
        if let Some(image) = &svc.image {
            doc.string("image", image);
        }
        match svc.port {
            Some(port) => doc.integer("port", port),
            None => doc.comment(" port not set: this is a background worker"),
        }
        doc.string("health_check_path", &svc.health_check_path);
        doc.integer("cpu", svc.cpu);
        doc.integer("memory_mib", svc.memory_mib);
        doc.integer("desired_count", svc.desired_count);
        if let Some(command) = &svc.command {
            doc.string("command", command);
        }
        if let Some(domain) = &svc.domain {
            doc.string("domain", domain);
        }
        doc.string("launch_type", svc.launch_type.as_str());
        if let Some(instance_type) = &svc.ec2_instance_type {
            doc.string("ec2_instance_type", instance_type);
        }
        if let Some(arch) = svc.architecture {
            doc.string("architecture", arch.as_str());
        }
        if let Some(script) = &svc.user_data_script {
            doc.string("user_data_script", script);
        }
        if !svc.secrets.is_empty() {
            doc.string_list("secrets", &svc.secrets);
        }
        if !svc.s3_access.is_empty() {
            doc.string_list("s3_access", &svc.s3_access);
        }
        if !svc.environment_variables.is_empty() {
            doc.inline_table(
                "environment_variables",
                svc.environment_variables.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        doc.boolean("enable_exec", svc.enable_exec);
        doc.boolean("enable_service_discovery", svc.enable_service_discovery);

        for ulimit in &svc.ulimits {
            doc.blank();
            doc.array_table("services.ulimits");
            doc.string("name", &ulimit.name);
            doc.integer("soft_limit", ulimit.soft_limit);
            doc.integer("hard_limit", ulimit.hard_limit);
        }

        for volume in &svc.ebs_volumes {
            doc.blank();
            doc.array_table("services.ebs_volumes");
            doc.string("name", &volume.name);
            doc.integer("size_gb", volume.size_gb);
            doc.string("mount_path", &volume.mount_path);
            doc.string("device_name", &volume.device_name);
            doc.string("volume_type", &volume.volume_type);
            doc.string("filesystem_type", &volume.filesystem_type);
        }
    }

    fn write_override(doc: &mut TomlDoc, env: &str, overrides: &EnvironmentOverride) {
        let env_key = key(env);
        doc.table(&format!("environments.{}", env_key));
        // Scalars must precede the sub-tables or they would land inside them.
        if let Some(instance_type) = &overrides.instance_type_override {
            doc.string("instance_type_override", instance_type);
        }
        if !overrides.domain_overrides.is_empty() {
            doc.blank();
            doc.table(&format!("environments.{}.domain_overrides", env_key));
            for (svc, domain) in &overrides.domain_overrides {
                doc.string(svc, domain);
            }
        }
        if !overrides.ec2_instance_type_override.is_empty() {
            doc.blank();
            doc.table(&format!("environments.{}.ec2_instance_type_override", env_key));
            for (svc, instance_type) in &overrides.ec2_instance_type_override {
                doc.string(svc, instance_type);
            }
        }
    }
}

/// Line-oriented TOML emitter.
#[derive(Default)]
struct TomlDoc {
    lines: Vec<String>,
}

impl TomlDoc {
    fn table(&mut self, header: &str) {
        self.lines.push(format!("[{}]", header));
    }

    fn array_table(&mut self, header: &str) {
        self.lines.push(format!("[[{}]]", header));
    }

    fn string(&mut self, k: &str, value: &str) {
        self.lines.push(format!("{} = {}", key(k), quote(value)));
    }

    fn integer(&mut self, k: &str, value: impl Into<i64>) {
        self.lines.push(format!("{} = {}", key(k), value.into()));
    }

    fn boolean(&mut self, k: &str, value: bool) {
        self.lines.push(format!("{} = {}", key(k), value));
    }

    fn string_list(&mut self, k: &str, values: &[String]) {
        let items: Vec<String> = values.iter().map(|v| quote(v)).collect();
        self.lines.push(format!("{} = [{}]", key(k), items.join(", ")));
    }

    fn inline_table<'a>(&mut self, k: &str, entries: impl Iterator<Item = (&'a str, &'a str)>) {
        let items: Vec<String> = entries
            .map(|(ek, ev)| format!("{} = {}", key(ek), quote(ev)))
            .collect();
        self.lines.push(format!("{} = {{ {} }}", key(k), items.join(", ")));
    }

    fn comment(&mut self, text: &str) {
        self.lines.push(format!("#{}", text));
    }

    fn line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Render a key bare when TOML allows it, quoted otherwise.
fn key(k: &str) -> String {
    let bare = !k.is_empty()
        && k
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        k.to_string()
    } else {
        quote(k)
    }
}

/// Quote a basic string, escaping backslashes, quotes and control characters.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ProjectBuilder;
    use crate::models::{Bucket, Service};
    use crate::reader::ConfigReader;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote(r"C:\temp"), r#""C:\\temp""#);
        assert_eq!(quote("a\nb"), r#""a\nb""#);
        assert_eq!(quote("\u{7}"), r#""\u0007""#);
    }

    #[test]
    fn test_key_quoting() {
        assert_eq!(key("enable_exec"), "enable_exec");
        assert_eq!(key("celery-worker"), "celery-worker");
        assert_eq!(key("cost.center"), "\"cost.center\"");
        assert_eq!(key(""), "\"\"");
    }

    #[test]
    fn test_dump_minimal_document() {
        let project = ProjectBuilder::new("webapp")
            .service(Service::new("web").with_domain("app.example.com"))
            .build()
            .unwrap();

        let expected = r#"#:schema darth-infra.schema.json

[project]
name = "webapp"
aws_region = "us-east-1"
vpc_name = "artshumrc-prod-standard"
environments = ["prod"]

[[services]]
name = "web"
dockerfile = "Dockerfile"
build_context = "."
port = 8000
health_check_path = "/health"
cpu = 256
memory_mib = 512
desired_count = 1
domain = "app.example.com"
launch_type = "fargate"
enable_exec = true
enable_service_discovery = false

[alb]
mode = "shared"
shared_alb_name = ""

"#;
        assert_eq!(ConfigWriter::dump(&project), expected);
    }

    #[test]
    fn test_dump_worker_comment_and_no_rds_section() {
        let project = ProjectBuilder::new("webapp")
            .service(Service::worker("celery"))
            .bucket(Bucket::new("media"))
            .build()
            .unwrap();

        let text = ConfigWriter::dump(&project);
        assert!(text.contains("# port not set: this is a background worker"));
        assert!(!text.contains("[rds]"));
        assert!(!text.contains("port ="));
        assert!(text.contains("[[s3_buckets]]\nname = \"media\"\npublic_read = false"));
    }

    #[test]
    fn test_dump_escaped_values_reparse() {
        let project = ProjectBuilder::new("webapp")
            .tag("cost.center", "R&D \"labs\"")
            .service(
                Service::worker("jobs")
                    .with_command("sh -c \"python manage.py rqworker\"")
                    .with_env_var("WIN_PATH", r"C:\data")
                    .with_env_var("MULTI", "line1\nline2"),
            )
            .build()
            .unwrap();

        let reparsed = ConfigReader::parse_str(&ConfigWriter::dump(&project)).unwrap();
        assert_eq!(reparsed, project);
    }
}
