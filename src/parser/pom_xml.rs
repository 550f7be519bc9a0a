//! pom.xml parser for Maven dependencies
//!
//! Reads `<dependency>` elements of the project (and of
//! `<dependencyManagement>` / `<profile>` blocks). Plugin dependencies are
//! build tooling and are skipped. Property placeholders such as
//! `${spring.version}` are kept verbatim.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{DeclaredDependency, VERSION_UNKNOWN};

/// Elements whose `<dependencies>` child lists project dependencies
const DEPENDENCY_OWNERS: [&str; 3] = ["project", "dependencyManagement", "profile"];

#[derive(Default)]
struct PendingDependency {
    group_id: String,
    artifact_id: String,
    version: String,
}

/// Parser for pom.xml files
pub struct PomXmlParser;

impl PomXmlParser {
    pub fn new() -> Self {
        Self
    }

    /// True when the element stack ends in `<owner><dependencies><dependency>`
    fn in_dependency(stack: &[String]) -> bool {
        match stack {
            [.., owner, deps, dep] => {
                dep == "dependency"
                    && deps == "dependencies"
                    && DEPENDENCY_OWNERS.contains(&owner.as_str())
            }
            _ => false,
        }
    }
}

impl Default for PomXmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PomXmlParser {
    fn file_name(&self) -> &'static str {
        "pom.xml"
    }

    fn parse(&self, content: &str) -> Result<Vec<DeclaredDependency>, ParseError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut results = Vec::new();
        let mut stack: Vec<String> = Vec::new();
        let mut current: Option<PendingDependency> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                ParseError::InvalidSyntax(format!(
                    "pom.xml at position {}: {}",
                    reader.error_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    stack.push(name);
                    if Self::in_dependency(&stack) {
                        current = Some(PendingDependency::default());
                    }
                }
                Event::End(_) => {
                    if Self::in_dependency(&stack)
                        && let Some(dep) = current.take()
                    {
                        if dep.group_id.is_empty() || dep.artifact_id.is_empty() {
                            debug!("Skipping dependency without coordinates");
                        } else {
                            let version = if dep.version.is_empty() {
                                VERSION_UNKNOWN.to_string()
                            } else {
                                dep.version
                            };
                            results.push(DeclaredDependency::new(
                                format!("{}:{}", dep.group_id, dep.artifact_id),
                                version,
                            ));
                        }
                    }
                    stack.pop();
                }
                Event::Text(text) => {
                    let Some(dep) = current.as_mut() else {
                        continue;
                    };
                    let (Some(field), true) = (
                        stack.last(),
                        Self::in_dependency(&stack[..stack.len().saturating_sub(1)]),
                    ) else {
                        continue;
                    };
                    let value = text
                        .unescape()
                        .map_err(|e| ParseError::InvalidSyntax(e.to_string()))?
                        .trim()
                        .to_string();
                    match field.as_str() {
                        "groupId" => dep.group_id = value,
                        "artifactId" => dep.artifact_id = value,
                        "version" => dep.version = value,
                        _ => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>app</artifactId>
  <version>1.0.0</version>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.springframework</groupId>
        <artifactId>spring-framework-bom</artifactId>
        <version>5.3.9</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>org.springframework</groupId>
      <artifactId>spring-core</artifactId>
      <version>${spring.version}</version>
    </dependency>
    <dependency>
      <groupId>junit</groupId>
      <artifactId>junit</artifactId>
      <scope>test</scope>
    </dependency>
  </dependencies>
  <build>
    <plugins>
      <plugin>
        <artifactId>maven-surefire-plugin</artifactId>
        <dependencies>
          <dependency>
            <groupId>org.apache.maven.surefire</groupId>
            <artifactId>surefire-junit4</artifactId>
            <version>2.22.2</version>
          </dependency>
        </dependencies>
      </plugin>
    </plugins>
  </build>
</project>
"#;

    #[test]
    fn parse_extracts_project_and_managed_dependencies() {
        let result = PomXmlParser::new().parse(POM).unwrap();
        assert_eq!(
            result,
            vec![
                DeclaredDependency::new("org.springframework:spring-framework-bom", "5.3.9"),
                DeclaredDependency::new("org.springframework:spring-core", "${spring.version}"),
                DeclaredDependency::new("junit:junit", VERSION_UNKNOWN),
            ]
        );
    }

    #[test]
    fn parse_does_not_pick_up_project_coordinates() {
        let result = PomXmlParser::new().parse(POM).unwrap();
        assert!(result.iter().all(|d| d.name != "com.example:app"));
    }

    #[test]
    fn parse_rejects_mismatched_tags() {
        let result = PomXmlParser::new().parse("<project><dependencies></project>");
        assert!(matches!(result, Err(ParseError::InvalidSyntax(_))));
    }
}
