//! Dependency cache rules.
//!
//! Every source file gets two artifacts under the output root:
//!
//! - `<source>.directImports`: the imports of the file that resolve to files
//!   under the search roots, in extraction order
//! - `<source>.transitiveImports`: the direct imports followed by the
//!   transitive imports of each, deduplicated in first-seen order, never
//!   including the file itself
//!
//! Both are produced by engine rules, so each is computed lazily, at most once
//! per build, and only rewritten when its text changes. The transitive rule
//! reads direct and transitive artifacts through the build context, which
//! both schedules them and records them as dependencies.
//!
//! # Cycles
//!
//! When the transitive rule for `A` reaches a file whose transitive artifact
//! is still being computed further up the stack, the import is a back-edge.
//! The cyclic import stays listed and its direct imports are merged, but its
//! transitive closure is not. Reading the back-edge file's direct artifact
//! keeps `A`'s artifact dependent on that file's imports.

pub mod artifact;
mod types;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{Config, Project};
use crate::engine::{BuildCtx, Engine, Rule, RuleSet};
use crate::extract::{ModuleImports, QuotedIncludes};
use crate::imports::compute_direct_imports;
use crate::util::fs::normalize_path;

pub use types::{ArtifactKind, DepsError};

/// Register direct- and transitive-import rules for one family of sources.
///
/// `applies_to` receives a source path relative to `project_root` and decides
/// whether this family handles it. `direct_imports` receives the absolute
/// source path and returns the absolute paths of its resolved imports; it
/// should read through the context so the artifact tracks its inputs.
///
/// The rules are named `<name>-direct` and `<name>-transitive`.
pub fn register_import_rules<P, D>(
  rules: &mut RuleSet,
  name: &str,
  output_root: &Path,
  project_root: &Path,
  applies_to: P,
  direct_imports: D,
) where
  P: Fn(&Path) -> bool + Send + Sync + 'static,
  D: Fn(&mut BuildCtx<'_, '_>, &Path) -> Result<Vec<PathBuf>, DepsError> + Send + Sync + 'static,
{
  let applies_to = Arc::new(applies_to);

  let matcher = |kind: ArtifactKind| {
    let output_root = output_root.to_path_buf();
    let applies_to = applies_to.clone();
    move |target: &Path| {
      kind
        .source_of(&output_root, target)
        .is_some_and(|source| (*applies_to)(&source))
    }
  };

  let direct_matcher = matcher(ArtifactKind::Direct);
  let transitive_matcher = matcher(ArtifactKind::Transitive);

  let out = output_root.to_path_buf();
  let root = project_root.to_path_buf();
  rules.add(Rule::new(format!("{}-direct", name), direct_matcher, move |ctx, target| {
    let source = source_for(ArtifactKind::Direct, &out, target)?;
    let imports = direct_imports(ctx, &root.join(&source))?;
    let relative = imports
      .iter()
      .map(|path| artifact::relative_to(&root, path))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(artifact::render(&relative)?.into_bytes())
  }));

  let out = output_root.to_path_buf();
  rules.add(Rule::new(format!("{}-transitive", name), transitive_matcher, move |ctx, target| {
    let source = source_for(ArtifactKind::Transitive, &out, target)?;
    let closure = transitive_closure(ctx, &out, &source, applies_to.as_ref())?;
    Ok(artifact::render(&closure)?.into_bytes())
  }));
}

fn source_for(kind: ArtifactKind, output_root: &Path, target: &Path) -> Result<PathBuf, DepsError> {
  kind
    .source_of(output_root, target)
    .ok_or_else(|| DepsError::NotAnArtifact(target.to_path_buf()))
}

fn transitive_closure<P>(
  ctx: &mut BuildCtx<'_, '_>,
  output_root: &Path,
  source: &Path,
  applies_to: &P,
) -> Result<Vec<PathBuf>, DepsError>
where
  P: Fn(&Path) -> bool + ?Sized,
{
  let direct_text = ctx.read_artifact(&ArtifactKind::Direct.artifact_path(output_root, source))?;
  let direct = artifact::parse(&direct_text);

  let mut seen: HashSet<PathBuf> = HashSet::new();
  let mut closure = Vec::new();
  let mut push = |path: PathBuf, closure: &mut Vec<PathBuf>| {
    if path != source && seen.insert(path.clone()) {
      closure.push(path);
    }
  };

  for path in &direct {
    push(path.clone(), &mut closure);
  }

  for import in &direct {
    if import == source {
      continue;
    }
    if !applies_to(import.as_path()) {
      debug!(
        source = %source.display(),
        import = %import.display(),
        "import handled by another rule family, not expanded"
      );
      continue;
    }

    let target = ArtifactKind::Transitive.artifact_path(output_root, import);
    match ctx.read_artifact(&target) {
      Ok(text) => {
        for path in artifact::parse(&text) {
          push(path, &mut closure);
        }
      }
      Err(e) if e.is_cycle() => {
        warn!(
          source = %source.display(),
          import = %import.display(),
          "import cycle, transitive imports truncated at back-edge"
        );
        let text = ctx.read_artifact(&ArtifactKind::Direct.artifact_path(output_root, import))?;
        for path in artifact::parse(&text) {
          push(path, &mut closure);
        }
      }
      Err(e) => return Err(e.into()),
    }
  }

  Ok(closure)
}

/// The built-in source families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
  /// Dotted-module sources, e.g. `Foo/Bar.hs`
  Module,
  /// Quoted-include sources, e.g. `foo.c` and `foo.h`
  Native,
}

impl Language {
  pub fn name(self) -> &'static str {
    match self {
      Language::Module => "module",
      Language::Native => "native",
    }
  }

  /// Which family handles `path`, if any. Module sources take precedence.
  pub fn of(config: &Config, path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;
    if ext == config.module_extension {
      Some(Language::Module)
    } else if config.native_extensions.iter().any(|e| e == ext) {
      Some(Language::Native)
    } else {
      None
    }
  }
}

/// Register the module-style and quoted-include families for `project`.
pub fn register_builtin_rules(rules: &mut RuleSet, project: &Project) -> Result<(), DepsError> {
  let config = project.config();
  let output_root = project.output_root();

  let modules = ModuleImports::new(&config.module_keyword, &config.module_extension)?;
  let module_roots = project.module_roots();
  let module_config = config.clone();
  register_import_rules(
    rules,
    Language::Module.name(),
    &output_root,
    project.root(),
    move |path: &Path| Language::of(&module_config, path) == Some(Language::Module),
    move |ctx, source| compute_direct_imports(ctx, source, &modules, &module_roots),
  );

  let includes = QuotedIncludes::new(&config.include_keyword);
  let include_roots = project.include_roots();
  let native_config = config.clone();
  register_import_rules(
    rules,
    Language::Native.name(),
    &output_root,
    project.root(),
    move |path: &Path| Language::of(&native_config, path) == Some(Language::Native),
    move |ctx, source| compute_direct_imports(ctx, source, &includes, &include_roots),
  );

  Ok(())
}

/// An engine with the built-in rules, using the project's trace database.
pub fn open_engine(project: &Project) -> Result<Engine, DepsError> {
  let mut rules = RuleSet::new();
  register_builtin_rules(&mut rules, project)?;
  Ok(Engine::open(rules, project.trace_db_path()))
}

/// Turn a user-supplied source path into a project-relative one.
///
/// Relative paths are taken as relative to the project root.
pub fn relative_source(project: &Project, path: &Path) -> Result<PathBuf, DepsError> {
  if path.is_absolute() {
    artifact::relative_to(project.root(), path)
  } else {
    let normalized = normalize_path(path);
    if normalized.starts_with("..") {
      return Err(DepsError::PathOutsideRoot {
        path: path.to_path_buf(),
        prefix: project.root().to_path_buf(),
      });
    }
    Ok(normalized)
  }
}

/// Both artifact targets for each source, direct first.
pub fn artifact_targets(project: &Project, sources: &[PathBuf]) -> Vec<PathBuf> {
  let output_root = project.output_root();
  sources
    .iter()
    .flat_map(|source| ArtifactKind::ALL.map(|kind| kind.artifact_path(&output_root, source)))
    .collect()
}

/// Every source under the project root handled by a built-in family, sorted.
///
/// Hidden directories and the output directory are skipped.
pub fn discover_sources(project: &Project) -> Vec<PathBuf> {
  let root = project.root();
  let output_root = project.output_root();

  let mut sources: Vec<PathBuf> = WalkDir::new(root)
    .into_iter()
    .filter_entry(|entry| {
      if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
      }
      let hidden = entry.file_name().to_str().is_some_and(|n| n.starts_with('.'));
      !hidden && entry.path() != output_root
    })
    .filter_map(|entry| match entry {
      Ok(entry) => Some(entry),
      Err(e) => {
        warn!(error = %e, "skipping unreadable entry");
        None
      }
    })
    .filter(|entry| entry.file_type().is_file())
    .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
    .filter(|path| Language::of(project.config(), path).is_some())
    .collect();

  sources.sort();
  sources
}

/// An artifact found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactEntry {
  pub kind: ArtifactKind,
  /// Project-relative source the artifact belongs to
  pub source: PathBuf,
  pub path: PathBuf,
}

/// Every artifact currently under the output root, sorted by path.
pub fn list_artifacts(project: &Project) -> Vec<ArtifactEntry> {
  let output_root = project.output_root();
  if !output_root.is_dir() {
    return Vec::new();
  }

  let mut entries: Vec<ArtifactEntry> = WalkDir::new(&output_root)
    .into_iter()
    .filter_map(|entry| entry.ok())
    .filter(|entry| entry.file_type().is_file())
    .filter_map(|entry| {
      let (kind, source) = ArtifactKind::classify(&output_root, entry.path())?;
      Some(ArtifactEntry {
        kind,
        source,
        path: entry.into_path(),
      })
    })
    .collect();

  entries.sort_by(|a, b| a.path.cmp(&b.path));
  entries
}
