use crate::error::{ErrorKind, Result};
use crate::graph::GraphExtractor;
use crate::legacy;
use crate::naming::character_dirs;
use crate::recovery::KeyRecoveryStrategy;
use derive_more::Display;
use exn::ResultExt;
use lpk_archive::{Archive, CompanionMetadata, Manifest};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Which extraction path an archive takes.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum Route {
    /// Model graphs are followed from each costume of each character.
    #[default]
    #[display("structured")]
    Structured,
    /// Members are copied or decrypted one by one under their own names.
    #[display("legacy")]
    Legacy,
}

/// Options for one extraction run.
#[derive(Debug, Default)]
pub struct ExtractOptions {
    pub recovery: KeyRecoveryStrategy,
    /// Recount the `Meta` section of recovered Cubism 3 motion files.
    pub fix_motions: bool,
}

/// What an extraction run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub route: Route,
    /// Characters whose directory was created.
    pub characters: usize,
    /// Model graphs written.
    pub models: usize,
    /// Resources recovered from model graphs.
    pub resources: usize,
    /// Members written by the legacy path.
    pub copied: usize,
    /// Costumes abandoned because their model graph was missing or corrupt.
    pub skipped: usize,
}

/// An opened LPK archive, ready to be extracted.
///
/// Opening reads the manifest and any companion metadata; nothing is written
/// until [`extract`](Self::extract).
pub struct LpkLoader {
    path: PathBuf,
    archive: Archive<BufReader<File>>,
    manifest: Manifest,
    companion: Option<CompanionMetadata>,
}

impl LpkLoader {
    /// Opens `archive`, loading `companion` metadata if given.
    ///
    /// # Errors
    ///
    /// Fails when the archive is unreadable, has no manifest, or the
    /// companion file cannot be parsed.
    #[instrument]
    pub fn open(archive: &Path, companion: Option<&Path>) -> Result<Self> {
        let companion = companion.map(CompanionMetadata::load).transpose().map_err(ErrorKind::archive)?;
        Self::with_companion(archive, companion)
    }

    /// Opens `archive` with companion metadata that is already in memory.
    pub fn with_companion(archive: &Path, companion: Option<CompanionMetadata>) -> Result<Self> {
        let mut reader = Archive::open(archive).map_err(ErrorKind::archive)?;
        let manifest = reader.manifest().map_err(ErrorKind::archive)?;
        tracing::info!(
            format = %manifest.format,
            encrypt = %manifest.encrypt,
            characters = manifest.characters.as_ref().map_or(0, Vec::len),
            "Opened package"
        );
        Ok(Self { path: archive.to_path_buf(), archive: reader, manifest, companion })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn companion(&self) -> Option<&CompanionMetadata> {
        self.companion.as_ref()
    }

    pub fn route(&self) -> Route {
        match self.manifest.is_structured() {
            true => Route::Structured,
            false => Route::Legacy,
        }
    }

    /// Extracts the archive into `output`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Errors that only concern one costume (a missing or corrupt model
    /// graph) are logged and counted in [`Summary::skipped`]; everything
    /// else aborts the run and leaves partial output behind.
    #[instrument(skip(self, options), fields(archive = %self.path.display(), route = %self.route()))]
    pub fn extract(&mut self, output: &Path, mut options: ExtractOptions) -> Result<Summary> {
        std::fs::create_dir_all(output).or_raise(|| ErrorKind::IoFailure(output.to_path_buf()))?;
        let summary = match self.route() {
            Route::Structured => self.extract_structured(output, &mut options)?,
            Route::Legacy => {
                tracing::warn!(declared = ?self.manifest.declared_type, "Unrecognized package layout; copying members");
                let copied = legacy::extract(&mut self.archive, &self.manifest, output)?;
                Summary { route: Route::Legacy, copied, ..Summary::default() }
            },
        };
        tracing::info!(
            characters = summary.characters,
            models = summary.models,
            resources = summary.resources,
            copied = summary.copied,
            skipped = summary.skipped,
            "Extraction complete"
        );
        Ok(summary)
    }

    fn extract_structured(&mut self, output: &Path, options: &mut ExtractOptions) -> Result<Summary> {
        let characters = self.manifest.characters.as_deref().unwrap_or_default();
        let title = self.companion.as_ref().and_then(CompanionMetadata::title);
        let dirs = character_dirs(characters, title);
        let mut extractor =
            GraphExtractor::new(&mut self.archive, &self.manifest, self.companion.clone(), output, options);
        let mut summary = Summary { route: Route::Structured, ..Summary::default() };

        for (character, dir) in characters.iter().zip(dirs) {
            let _span = tracing::info_span!("character", name = %character.name, dir = %dir.display()).entered();
            let path = output.join(&dir);
            std::fs::create_dir_all(&path).or_raise(|| ErrorKind::IoFailure(path.clone()))?;
            summary.characters += 1;
            for (index, costume) in character.costumes.iter().enumerate() {
                if costume.model_ref.is_empty() {
                    continue;
                }
                let extracted = extractor
                    .ensure_key(&costume.model_ref, &self.path, &mut options.recovery)
                    .and_then(|()| extractor.extract_graph(&costume.model_ref, &dir));
                match extracted {
                    Ok(()) => {},
                    Err(err) if err.is_skippable() => {
                        tracing::warn!(costume = index, member = %costume.model_ref, error = %err, "Skipping costume");
                        summary.skipped += 1;
                    },
                    Err(err) => return Err(err),
                }
            }
            extractor.flush_character()?;
        }
        summary.models = extractor.models();
        summary.resources = extractor.resources();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpk_archive::error::ErrorKind as ArchiveErrorKind;
    use lpk_archive::mock::MockArchive;
    use rstest::rstest;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";
    const MOC3: &[u8] = b"MOC3\x04\x00\x00\x00";

    fn member(n: u32) -> String {
        format!("{n:032x}.bin")
    }

    fn standard(characters: Value) -> Value {
        json!({"type": "STD2_0", "id": "pkg", "encrypt": "true", "list": characters})
    }

    fn steam(characters: Value) -> Value {
        json!({"type": "STM_1_0", "id": "pkg", "encrypt": "true", "list": characters})
    }

    fn alice(costumes: &[&str]) -> Value {
        let costumes: Vec<Value> = costumes.iter().map(|path| json!({"path": path})).collect();
        json!([{"character": "Alice", "costume": costumes}])
    }

    fn graph(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn companion(file_id: &str) -> CompanionMetadata {
        CompanionMetadata {
            file_id: file_id.to_string(),
            meta_data: "meta".to_string(),
            ..CompanionMetadata::default()
        }
    }

    fn write(mock: MockArchive, file_name: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);
        mock.write(&path);
        (dir, path)
    }

    fn extract(path: &Path, companion: Option<CompanionMetadata>, options: ExtractOptions) -> Result<(PathBuf, Summary)> {
        let output = path.with_file_name("out");
        let summary = LpkLoader::with_companion(path, companion)?.extract(&output, options)?;
        Ok((output, summary))
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_extracts_standard_package() {
        let (a, b) = (member(0xA), member(0xB));
        let mock = MockArchive::new(standard(alice(&[&a])))
            .member(&a, graph(json!({"FileReferences_Texture": b})))
            .member(&b, PNG);
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(read_json(&output.join("Alice/model.json")), json!({"FileReferences_Texture": "Texture.png"}));
        assert_eq!(std::fs::read(output.join("Alice/Texture.png")).unwrap(), PNG);
        assert_eq!(file_names(&output.join("Alice")), ["Texture.png", "model.json"]);
        assert_eq!(
            summary,
            Summary { route: Route::Structured, characters: 1, models: 1, resources: 1, ..Summary::default() }
        );
    }

    #[test]
    fn test_overlong_hint_falls_back_to_hashed_name() {
        let (a, b) = (member(0xA), member(0xB));
        let key = format!("FileReferences_{}", "x".repeat(300));
        let mock = MockArchive::new(standard(alice(&[&a])))
            .member(&a, graph(json!({(key.clone()): b})))
            .member(&b, PNG);
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();

        let hashed = format!("{}.png", crate::naming::hashed_stem(PNG));
        assert_eq!(read_json(&output.join("Alice/model.json")), json!({(key): hashed}));
        assert_eq!(std::fs::read(output.join("Alice").join(&hashed)).unwrap(), PNG);
        assert_eq!(summary.resources, 1);
    }

    #[test]
    fn test_self_referencing_graph_terminates() {
        let a = member(0xA);
        let mock = MockArchive::new(standard(alice(&[&a])))
            .member(&a, graph(json!({"Hit": {"Tap_Command": format!("change_cos {a}")}})));
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(file_names(&output.join("Alice")), ["model.json"]);
        assert_eq!(read_json(&output.join("Alice/model.json")), json!({"Hit": {"Tap_Command": "change_cos model.json"}}));
        assert_eq!(summary.models, 1);
    }

    #[test]
    fn test_mutually_referencing_sub_graphs() {
        let (a, c, d) = (member(0xA), member(0xC), member(0xD));
        let mock = MockArchive::new(standard(alice(&[&a])))
            .member(&a, graph(json!({"Hit_Command": format!("change_cos {c}")})))
            .member(&c, graph(json!({"Hit_Command": format!("change_cos {a}"), "FileReferences_Moc": d})))
            .member(&d, MOC3);
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(file_names(&output.join("Alice")), ["Moc.moc3", "model.json", "model_1.json"]);
        assert_eq!(read_json(&output.join("Alice/model.json")), json!({"Hit_Command": "change_cos model_1.json"}));
        assert_eq!(
            read_json(&output.join("Alice/model_1.json")),
            json!({"Hit_Command": "change_cos model.json", "FileReferences_Moc": "Moc.moc3"})
        );
        assert_eq!(summary.models, 2);
        assert_eq!(summary.resources, 1);
    }

    #[test]
    fn test_shared_resource_is_recovered_once() {
        let (a, b, c) = (member(0xA), member(0xB), member(0xC));
        let mock = MockArchive::new(standard(alice(&[&a, &c])))
            .member(&a, graph(json!({"FileReferences_Texture": b})))
            .member(&c, graph(json!({"FileReferences": {"Textures": [b]}})))
            .member(&b, PNG);
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(file_names(&output.join("Alice")), ["Texture.png", "model.json", "model_1.json"]);
        assert_eq!(read_json(&output.join("Alice/model_1.json")), json!({"FileReferences": {"Textures": ["Texture.png"]}}));
        assert_eq!(summary.resources, 1);
    }

    #[test]
    fn test_colliding_names_are_suffixed() {
        let (a, b, c, d) = (member(0xA), member(0xB), member(0xC), member(0xD));
        let mock = MockArchive::new(standard(alice(&[&a, &c])))
            .member(&a, graph(json!({"FileReferences_Texture": b})))
            .member(&c, graph(json!({"FileReferences_Texture": d})))
            .member(&b, PNG)
            .member(&d, [PNG, b"other".as_slice()].concat());
        let (_dir, path) = write(mock, "package.lpk");
        let (output, _) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(file_names(&output.join("Alice")), ["Texture.png", "Texture_1.png", "model.json", "model_1.json"]);
        assert_eq!(read_json(&output.join("Alice/model_1.json")), json!({"FileReferences_Texture": "Texture_1.png"}));
        assert_eq!(std::fs::read(output.join("Alice/Texture_1.png")).unwrap(), [PNG, b"other".as_slice()].concat());
    }

    #[test]
    fn test_command_resources_use_command_path() {
        let (a, b) = (member(0xA), member(0xB));
        let mock = MockArchive::new(standard(alice(&[&a])))
            .member(&a, graph(json!({"Hit": {"Tap_Command": format!("start_mtn idle;play_sound {b}")}})))
            .member(&b, b"OggS\x00\x02");
        let (_dir, path) = write(mock, "package.lpk");
        let (output, _) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(file_names(&output.join("Alice")), ["Hit_Tap_Command.ogg", "model.json"]);
        assert_eq!(
            read_json(&output.join("Alice/model.json")),
            json!({"Hit": {"Tap_Command": "start_mtn idle;play_sound Hit_Tap_Command.ogg"}})
        );
    }

    #[test]
    fn test_corrupt_costume_is_skipped() {
        let (a, b, c) = (member(0xA), member(0xB), member(0xC));
        let mock = MockArchive::new(standard(alice(&[&a, &c, &member(0xF)])))
            .member(&a, b"this is not json")
            .member(&c, graph(json!({"FileReferences_Texture": b})))
            .member(&b, PNG);
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(file_names(&output.join("Alice")), ["Texture.png", "model.json"]);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.models, 1);
    }

    #[test]
    fn test_missing_resource_keeps_reference() {
        let (a, missing) = (member(0xA), member(0xE));
        let mock = MockArchive::new(standard(alice(&[&a]))).member(&a, graph(json!({"FileReferences_Texture": missing})));
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(read_json(&output.join("Alice/model.json")), json!({"FileReferences_Texture": missing}));
        assert_eq!(summary.resources, 0);
    }

    #[test]
    fn test_characters_get_their_own_directories() {
        let (a, b, c) = (member(0xA), member(0xB), member(0xC));
        let characters = json!([
            {"character": "Alice", "costume": [{"path": a}]},
            {"character": "", "costume": [{"path": ""}, {"path": c}]},
        ]);
        let mock = MockArchive::new(standard(characters))
            .member(&a, graph(json!({"FileReferences_Texture": b})))
            .member(&c, graph(json!({"FileReferences_Texture": b})))
            .member(&b, PNG);
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(file_names(&output), ["Alice", "character"]);
        assert_eq!(
            read_json(&output.join("character/model.json")),
            json!({"FileReferences_Texture": "../Alice/Texture.png"})
        );
        assert_eq!(summary.characters, 2);
        assert_eq!(summary.skipped, 0);
    }

    #[test]
    fn test_repairs_motions_when_asked() {
        let (a, m) = (member(0xA), member(0x30));
        let motion = json!({
            "Version": 3,
            "Meta": {"CurveCount": 5, "TotalSegmentCount": 5, "TotalPointCount": 5},
            "Curves": [{"Segments": [0, 0, 0, 1, 1]}],
        });
        let mock = MockArchive::new(standard(alice(&[&a])))
            .member(&a, graph(json!({"FileReferences": {"Motions": {"Idle": [{"File": m}]}}})))
            .member(&m, graph(motion));
        let (_dir, path) = write(mock, "package.lpk");
        let options = ExtractOptions { fix_motions: true, ..ExtractOptions::default() };
        let (output, _) = extract(&path, None, options).unwrap();

        let repaired = read_json(&output.join("Alice/Motions_Idle_0.json"));
        assert_eq!(repaired["Meta"], json!({"CurveCount": 1, "TotalSegmentCount": 1, "TotalPointCount": 2}));
    }

    #[test]
    fn test_steam_package_uses_companion() {
        let (a, b) = (member(0xA), member(0xB));
        let companion = CompanionMetadata { title: Some("My Pack".to_string()), ..companion("2812345678") };
        let mock = MockArchive::new(steam(alice(&[&a])))
            .companion(companion.clone())
            .member(&a, graph(json!({"FileReferences_Texture": b})))
            .member(&b, PNG);
        let (_dir, path) = write(mock, "2812345678.lpk");
        let (output, _) = extract(&path, Some(companion), ExtractOptions::default()).unwrap();

        assert_eq!(file_names(&output), ["My Pack"]);
        assert_eq!(std::fs::read(output.join("My Pack/Texture.png")).unwrap(), PNG);
    }

    #[test]
    fn test_steam_package_without_companion_fails() {
        let a = member(0xA);
        let mock = MockArchive::new(steam(alice(&[&a])))
            .companion(companion("1"))
            .member(&a, graph(json!({"Version": 3})));
        let (_dir, path) = write(mock, "1.lpk");
        let err = extract(&path, None, ExtractOptions::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Archive(ArchiveErrorKind::MissingCompanionMetadata)));
    }

    fn wrong_file_id_package(file_name: &str) -> (TempDir, PathBuf) {
        let a = member(0xA);
        let entry = json!({"Version": 3, "FileReferences": {"Moc": "model.moc3", "Textures": ["texture_00.png"]}});
        let mock = MockArchive::new(steam(alice(&[&a]))).companion(companion("2812345678")).member(&a, graph(entry));
        write(mock, file_name)
    }

    #[test]
    fn test_recovers_file_id_from_archive_name() {
        let (_dir, path) = wrong_file_id_package("2812345678.lpk");
        let (output, summary) = extract(&path, Some(companion("1")), ExtractOptions::default()).unwrap();
        assert_eq!(read_json(&output.join("Alice/model.json"))["Version"], 3);
        assert_eq!(summary.models, 1);
    }

    #[test]
    fn test_recovers_file_id_from_recorded_archive_name() {
        let (_dir, path) = wrong_file_id_package("renamed.lpk");
        let companion = CompanionMetadata { lpk_file: Some("2812345678.lpk".to_string()), ..companion("1") };
        let (_, summary) = extract(&path, Some(companion), ExtractOptions::default()).unwrap();
        assert_eq!(summary.models, 1);
    }

    #[test]
    fn test_deterministic_recovery_gives_up() {
        let (_dir, path) = wrong_file_id_package("renamed.lpk");
        let err = extract(&path, Some(companion("1")), ExtractOptions::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::KeyRecoveryFailed));
    }

    #[test]
    fn test_interactive_recovery_asks_once() {
        let (_dir, path) = wrong_file_id_package("renamed.lpk");
        let mut asked = 0;
        let options = ExtractOptions {
            recovery: KeyRecoveryStrategy::interactive(move |_: &Path| {
                asked += 1;
                assert_eq!(asked, 1);
                Some("2812345678".to_string())
            }),
            ..ExtractOptions::default()
        };
        let (_, summary) = extract(&path, Some(companion("1")), options).unwrap();
        assert_eq!(summary.models, 1);
    }

    #[test]
    fn test_legacy_package_is_copied_and_decrypted() {
        let mock = MockArchive::new(json!({"id": "pkg"}))
            .directory("empty/")
            .legacy_member("textures/texture_00.png", PNG)
            .raw_member("model.json", b"{\"Version\": 3}")
            .raw_member("notes.TXT", b"plain");
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();

        assert_eq!(std::fs::read(output.join("textures/texture_00.png")).unwrap(), PNG);
        assert_eq!(std::fs::read(output.join("model.json")).unwrap(), b"{\"Version\": 3}");
        assert_eq!(std::fs::read(output.join("notes.TXT")).unwrap(), b"plain");
        assert!(output.join("empty").is_dir());
        assert!(output.join(lpk_archive::hashed_name(lpk_archive::MANIFEST_NAME)).is_file());
        assert_eq!(summary, Summary { route: Route::Legacy, copied: 4, ..Summary::default() });
    }

    #[test]
    fn test_unencrypted_legacy_package_is_copied_verbatim() {
        let mock = MockArchive::new(json!({"id": "pkg", "encrypt": "false"})).raw_member("textures/a.bin", b"\x01\x02");
        let (_dir, path) = write(mock, "package.lpk");
        let (output, _) = extract(&path, None, ExtractOptions::default()).unwrap();
        assert_eq!(std::fs::read(output.join("textures/a.bin")).unwrap(), b"\x01\x02");
    }

    #[rstest]
    #[case(json!("FALSE"))]
    #[case(json!(false))]
    #[case(json!("no"))]
    fn test_legacy_flag_other_than_false_still_decrypts(#[case] encrypt: Value) {
        let mock = MockArchive::new(json!({"id": "pkg", "encrypt": encrypt})).legacy_member("textures/a.png", PNG);
        let (_dir, path) = write(mock, "package.lpk");
        let (output, _) = extract(&path, None, ExtractOptions::default()).unwrap();
        assert_eq!(std::fs::read(output.join("textures/a.png")).unwrap(), PNG);
    }

    #[rstest]
    #[case(json!("TRUE"))]
    #[case(json!(true))]
    #[case(json!("yes"))]
    fn test_steam_flag_other_than_true_uses_key_zero(#[case] encrypt: Value) {
        let (a, b) = (member(0xA), member(0xB));
        let manifest = json!({"type": "STM_1_0", "id": "pkg", "encrypt": encrypt, "list": alice(&[&a])});
        let entry = graph(json!({"FileReferences_Texture": b}));
        let mock = MockArchive::new(manifest)
            .raw_member(&a, lpk_cipher::transform(0, &entry))
            .raw_member(&b, lpk_cipher::transform(0, PNG));
        let (_dir, path) = write(mock, "package.lpk");
        let (output, summary) = extract(&path, None, ExtractOptions::default()).unwrap();
        assert_eq!(std::fs::read(output.join("Alice/Texture.png")).unwrap(), PNG);
        assert_eq!(summary.models, 1);
    }

    #[test]
    fn test_unknown_type_takes_legacy_route() {
        let a = member(0xA);
        let manifest = json!({"type": "XYZ_9", "id": "pkg", "list": [{"character": "Alice", "costume": [{"path": a}]}]});
        let mock = MockArchive::new(manifest).legacy_member(&a, b"payload");
        let (_dir, path) = write(mock, "package.lpk");
        let loader = LpkLoader::with_companion(&path, None).unwrap();
        assert_eq!(loader.route(), Route::Legacy);
        let (output, _) = extract(&path, None, ExtractOptions::default()).unwrap();
        assert_eq!(std::fs::read(output.join(&a)).unwrap(), b"payload");
    }

    #[test]
    fn test_open_without_manifest_fails() {
        let (_dir, path) = write(MockArchive::new(json!({})).without_manifest().raw_member("a.txt", b"a"), "x.lpk");
        let err = LpkLoader::open(&path, None).err().unwrap();
        assert!(matches!(&*err, ErrorKind::Archive(ArchiveErrorKind::ManifestNotFound)));
    }

    #[test]
    fn test_open_with_bad_companion_fails() {
        let (dir, path) = write(MockArchive::new(standard(json!([]))), "x.lpk");
        let companion = dir.path().join("config.json");
        std::fs::write(&companion, b"{not json").unwrap();
        let err = LpkLoader::open(&path, Some(&companion)).err().unwrap();
        assert!(matches!(&*err, ErrorKind::Archive(ArchiveErrorKind::InvalidCompanion(_))));
    }
}
