//! Renderer adapter behaviour against the checked-in template assets.

use std::fs;
use std::path::{Path, PathBuf};

use bitframe_core::{config, ConfigError, Params, RendererConfig, Scope, TemplatePath};
use bitframe_renderer::{EngineError, PathOutcome, RenderError, Renderer};
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

const NAME: &str = "{{ name }}";
const NAME_OR_EMPTY: &str = "{{ name | default(value=\"\") }}";

fn asset_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("assets")
}

fn asset(rel: &str) -> String {
    fs::read_to_string(asset_dir().join(rel)).expect("read asset")
}

fn renderer() -> Renderer {
    Renderer::new(Some(asset_dir()))
}

fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().expect("object")
}

fn name(value: &str) -> Params {
    params(json!({ "name": value }))
}

// ---------------------------------------------------------------------------
// 1. Paths
// ---------------------------------------------------------------------------

#[test]
fn null_directory_yields_no_paths() {
    let renderer = Renderer::new(None);
    assert!(renderer.paths().is_empty());
    assert_eq!(renderer.engine().directory(), None);
}

#[test]
fn directory_at_construction_is_the_only_path() {
    let renderer = renderer();
    let paths = renderer.paths();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].path(), asset_dir());
    assert_eq!(paths[0].to_string(), asset_dir().display().to_string());
    assert!(paths[0].namespace().is_none());
    assert_eq!(renderer.engine().directory(), Some(asset_dir().as_path()));
}

#[test]
fn add_path_sets_missing_directory() {
    let mut renderer = Renderer::new(None);
    let outcome = renderer.add_path(asset_dir(), None).expect("add_path");
    assert_eq!(outcome, PathOutcome::SetDirectory);

    let paths = renderer.paths();
    assert_eq!(paths, vec![TemplatePath::unnamespaced(asset_dir())]);
}

#[test]
fn second_unnamespaced_path_is_a_noop() {
    let mut renderer = Renderer::new(None);
    renderer.add_path(asset_dir(), None).expect("first add_path");
    let before = renderer.paths();

    let outcome = renderer
        .add_path(env!("CARGO_MANIFEST_DIR"), None)
        .expect("second add_path");
    assert_eq!(outcome, PathOutcome::IgnoredDuplicate);
    assert!(outcome.to_string().contains("duplicate"));

    let after = renderer.paths();
    assert_eq!(after.len(), 1);
    assert_eq!(after, before);
}

#[test]
fn namespaced_path_is_always_added() {
    let mut renderer = Renderer::new(None);
    let outcome = renderer.add_path(asset_dir(), Some("test")).expect("add_path");
    assert_eq!(outcome, PathOutcome::AddedNamespace);

    let paths = renderer.paths();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].path(), asset_dir());
    assert_eq!(paths[0].namespace(), Some("test"));

    let mut renderer = renderer_with_namespaces();
    let before = renderer.paths().len();
    renderer.add_path(asset_dir().join("partials"), Some("partials")).expect("add_path");
    let paths = renderer.paths();
    assert_eq!(paths.len(), before + 1);
    assert_eq!(paths.last().and_then(TemplatePath::namespace), Some("partials"));
}

#[test]
fn paths_list_directory_then_namespaces_in_order() {
    let renderer = renderer_with_namespaces();
    let paths = renderer.paths();
    assert_eq!(
        paths,
        vec![
            TemplatePath::unnamespaced(asset_dir()),
            TemplatePath::new(asset_dir().join("test"), Some("test".into())),
            TemplatePath::new(asset_dir(), Some("alt".into())),
        ]
    );
}

#[test]
fn reusing_a_namespace_is_an_engine_error() {
    let mut renderer = renderer_with_namespaces();
    let err = renderer.add_path(env!("CARGO_MANIFEST_DIR"), Some("test")).unwrap_err();
    assert!(
        matches!(err, RenderError::Engine(EngineError::FolderExists(ref ns)) if ns == "test"),
        "got: {err}"
    );
    assert_eq!(renderer.paths()[1].path(), asset_dir().join("test"));
}

fn renderer_with_namespaces() -> Renderer {
    let mut renderer = renderer();
    renderer.add_path(asset_dir().join("test"), Some("test")).expect("test ns");
    renderer.add_path(asset_dir(), Some("alt")).expect("alt ns");
    renderer
}

// ---------------------------------------------------------------------------
// 2. Rendering
// ---------------------------------------------------------------------------

#[test]
fn delegates_rendering_to_engine() {
    let result = renderer().render("plates", &name("BitFrame")).expect("render");
    assert!(result.contains("BitFrame"));
    assert_eq!(result, asset("plates.tpl").replace(NAME, "BitFrame"));
}

#[test]
fn renders_with_no_params() {
    let result = renderer().render("plates_null", &Params::new()).expect("render");
    assert_eq!(result, asset("plates_null.tpl"));
}

#[test]
fn resolves_namespaced_template() {
    let mut renderer = renderer();
    renderer.add_path(asset_dir().join("test"), Some("test")).expect("add_path");
    let result = renderer.render("test::namespaced", &Params::new()).expect("render");
    assert_eq!(result, asset("test/namespaced.tpl"));
}

#[test]
fn namespace_falls_back_to_base_directory() {
    let mut renderer = renderer();
    renderer.add_path(asset_dir().join("test"), Some("test")).expect("add_path");
    let result = renderer.render("test::plates", &name("Fallback")).expect("render");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "Fallback"));
}

#[test]
fn renders_layouts_and_includes() {
    let data = params(json!({ "name": "BitFrame", "title": "Home" }));
    let result = renderer().render("page", &data).expect("render");
    assert_eq!(result, "<html><header>Home</header><p>BitFrame</p></html>");
}

#[test]
fn render_serialize_accepts_structs() {
    #[derive(serde::Serialize)]
    struct Page<'a> {
        name: &'a str,
    }
    let result = renderer()
        .render_serialize("plates", &Page { name: "Serde" })
        .expect("render");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "Serde"));
}

#[test]
fn render_errors_surface_from_engine() {
    let err = renderer().render("plates", &Params::new()).unwrap_err();
    assert!(matches!(err, RenderError::Engine(EngineError::Tera(_))), "got: {err}");
}

#[rstest]
#[case::empty("")]
#[case::missing("nonexistent")]
#[case::unknown_namespace("nope::plates")]
#[case::two_separators("test::test::namespaced")]
#[case::empty_file_part("test::")]
fn unresolvable_names_are_not_found(#[case] template: &str) {
    let mut renderer = renderer();
    renderer.add_path(asset_dir().join("test"), Some("test")).expect("add_path");
    let err = renderer.render(template, &name("x")).unwrap_err();
    assert!(
        matches!(err, RenderError::NotFound(ref n) if n == template),
        "got: {err}"
    );
    assert!(err.to_string().contains("template not found"));
}

#[test]
fn names_need_a_directory() {
    let err = Renderer::new(None).render("plates", &Params::new()).unwrap_err();
    assert!(matches!(err, RenderError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// 3. Default params
// ---------------------------------------------------------------------------

#[test]
fn default_param_for_one_template() {
    let mut renderer = renderer();
    renderer
        .add_default_param(Scope::template("plates"), name("Plates"))
        .expect("add_default_param");

    let result = renderer.render("plates", &Params::new()).expect("render plates");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "Plates"));

    let result = renderer.render("plates2", &Params::new()).expect("render plates2");
    assert_eq!(result, asset("plates2.tpl").replace(NAME_OR_EMPTY, ""));
}

#[test]
fn default_param_for_other_template_leaves_plates_alone() {
    let mut renderer = renderer();
    renderer
        .add_default_param(Scope::template("plates2"), name("X"))
        .expect("add_default_param");

    let result = renderer.render("plates2", &Params::new()).expect("render plates2");
    assert_eq!(result, asset("plates2.tpl").replace(NAME_OR_EMPTY, "X"));

    let err = renderer.render("plates", &Params::new()).unwrap_err();
    assert!(matches!(err, RenderError::Engine(EngineError::Tera(_))), "got: {err}");
}

#[test]
fn shared_params_apply_to_every_template() {
    let mut renderer = renderer();
    renderer
        .add_default_param(Scope::AllTemplates, name("Plates"))
        .expect("add_default_param");

    let result = renderer.render("plates", &Params::new()).expect("render plates");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "Plates"));

    let result = renderer.render("plates2", &Params::new()).expect("render plates2");
    assert_eq!(result, asset("plates2.tpl").replace(NAME_OR_EMPTY, "Plates"));
}

#[test]
fn shared_params_can_be_overwritten() {
    let mut renderer = Renderer::with_options(Some(asset_dir()), "tpl", name("Plates"));

    let result = renderer.render("plates", &Params::new()).expect("render");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "Plates"));

    renderer
        .add_default_param(Scope::AllTemplates, name("BitFrame"))
        .expect("add_default_param");
    let result = renderer.render("plates", &Params::new()).expect("render");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "BitFrame"));

    let result = renderer.render("plates", &name("BitFrame Test2")).expect("render");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "BitFrame Test2"));
}

#[test]
fn per_template_params_override_shared() {
    let mut renderer = renderer();
    renderer
        .add_default_param(Scope::AllTemplates, name("Plates"))
        .expect("shared");
    renderer
        .add_default_param(Scope::template("plates2"), name("BitFrame"))
        .expect("plates2");

    let result = renderer.render("plates", &Params::new()).expect("render plates");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "Plates"));

    let result = renderer.render("plates2", &Params::new()).expect("render plates2");
    assert_eq!(result, asset("plates2.tpl").replace(NAME_OR_EMPTY, "BitFrame"));
}

#[test]
fn render_params_override_defaults_for_that_call_only() {
    let mut renderer = renderer();
    renderer
        .add_default_param(Scope::AllTemplates, name("Plates"))
        .expect("add_default_param");

    let result = renderer.render("plates", &name("BitFrame2")).expect("render");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "BitFrame2"));

    let result = renderer.render("plates", &Params::new()).expect("render");
    assert_eq!(result, asset("plates.tpl").replace(NAME, "Plates"));
}

#[rstest]
#[case::empty_template_name(Scope::template(""), params(json!({ "a": 1 })))]
#[case::empty_params(Scope::template("k"), Params::new())]
#[case::empty_shared_params(Scope::AllTemplates, Params::new())]
fn invalid_default_params_are_rejected(#[case] scope: Scope, #[case] data: Params) {
    let mut renderer = renderer();
    let err = renderer.add_default_param(scope, data).unwrap_err();
    assert!(matches!(err, RenderError::InvalidArgument(_)), "got: {err}");
    assert!(renderer.engine().data(None).is_empty());
}

// ---------------------------------------------------------------------------
// 4. Configuration
// ---------------------------------------------------------------------------

#[test]
fn renderer_from_config_file() {
    let dir = TempDir::new().expect("tempdir");
    let templates = dir.path().join("templates");
    fs::create_dir_all(templates.join("mail")).expect("mkdir");
    fs::write(templates.join("home.html"), "{{ site }}: {{ name }}").expect("write");
    fs::write(templates.join("mail").join("welcome.html"), "Hi {{ name }}").expect("write");

    let cfg_path = dir.path().join("renderer.yaml");
    fs::write(
        &cfg_path,
        "directory: templates\n\
         extension: html\n\
         folders:\n\
         \x20 - namespace: mail\n\
         \x20   path: templates/mail\n\
         defaults:\n\
         \x20 all:\n\
         \x20   site: BitFrame\n\
         \x20   name: everyone\n\
         \x20 templates:\n\
         \x20   mail::welcome:\n\
         \x20     name: new user\n",
    )
    .expect("write config");

    let cfg: RendererConfig = config::load(&cfg_path).expect("load");
    let renderer = Renderer::from_config(&cfg).expect("from_config");

    assert_eq!(
        renderer.paths(),
        vec![
            TemplatePath::unnamespaced(&templates),
            TemplatePath::new(templates.join("mail"), Some("mail".into())),
        ]
    );
    assert_eq!(renderer.render("home", &Params::new()).unwrap(), "BitFrame: everyone");
    assert_eq!(renderer.render("mail::welcome", &Params::new()).unwrap(), "Hi new user");
}

#[test]
fn renderer_from_config_path() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("plates.tpl"), "Hello {{ name }}").expect("write");
    let cfg_path = dir.path().join("renderer.yaml");
    fs::write(&cfg_path, "directory: .\ndefaults:\n  all:\n    name: file\n").expect("write config");

    let renderer = Renderer::from_config_file(&cfg_path).expect("from_config_file");
    assert_eq!(renderer.paths(), vec![TemplatePath::unnamespaced(dir.path().join("."))]);
    assert_eq!(renderer.render("plates", &Params::new()).unwrap(), "Hello file");
}

#[test]
fn renderer_from_missing_config_path_is_config_error() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("absent.yaml");

    let err = Renderer::from_config_file(&missing).err().expect("error");
    assert!(
        matches!(err, RenderError::Config(ConfigError::NotFound { ref path }) if *path == missing),
        "got: {err}"
    );
}
