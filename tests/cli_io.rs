//! Parsing and formatting tests for the command-line layer.

use std::fs;
use std::path::PathBuf;

use glam::DVec3;
use htm::input::{self, InputError, VertexFormat};
use htm::output::{self, IdStyle, OutputFormat, TextOptions};
use htm_index::{CellId, Cover, HtmError, RangeSet};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("htm-cli-io-{}-{}", std::process::id(), name))
}

fn id(name: &str) -> CellId {
    CellId::from_name(name).unwrap()
}

fn sample_set() -> RangeSet {
    RangeSet::from_ids([id("N30"), id("N31"), id("S12")], 1)
}

#[test]
fn test_parse_cartesian_vertex() {
    let v = input::parse_vertex("0,0,2", VertexFormat::Cartesian).unwrap();
    assert!((v - DVec3::Z).length() < 1e-12, "got {:?}", v);

    let v = input::parse_vertex(" -1.5, 0, 0 ", VertexFormat::Cartesian).unwrap();
    assert!((v - DVec3::NEG_X).length() < 1e-12, "got {:?}", v);
}

#[test]
fn test_parse_latlon_vertex() {
    let v = input::parse_vertex("0,90", VertexFormat::LatLon).unwrap();
    assert!((v - DVec3::Y).length() < 1e-12, "got {:?}", v);

    let v = input::parse_vertex("90,0", VertexFormat::LatLon).unwrap();
    assert!((v - DVec3::Z).length() < 1e-12, "got {:?}", v);
}

#[test]
fn test_parse_vertex_errors() {
    assert!(matches!(
        input::parse_vertex("1,2", VertexFormat::Cartesian),
        Err(InputError::Vertex { expected: 3, .. })
    ));
    assert!(matches!(
        input::parse_vertex("1,2,3", VertexFormat::LatLon),
        Err(InputError::Vertex { expected: 2, .. })
    ));
    assert!(matches!(
        input::parse_vertex("1,x,3", VertexFormat::Cartesian),
        Err(InputError::Number(_))
    ));
}

#[test]
fn test_parse_zero_vertex() {
    assert!(matches!(
        input::parse_vertex("0,0,0", VertexFormat::Cartesian),
        Err(InputError::ZeroVertex(_))
    ));
    assert!(matches!(
        input::parse_convex(&["0,0,0", "0,1,0", "0,0,1"], VertexFormat::Cartesian),
        Err(InputError::ZeroVertex(_))
    ));
}

#[test]
fn test_parse_convex() {
    let convex = input::parse_convex(&["1,0,0", "0,1,0", "0,0,1"], VertexFormat::Cartesian).unwrap();
    assert_eq!(convex.caps().len(), 3);
    assert_eq!(convex.vertices().len(), 3);

    assert!(matches!(
        input::parse_convex(&["1,0,0", "0,1,0"], VertexFormat::Cartesian),
        Err(InputError::Htm(HtmError::InsufficientVertices(2)))
    ));
    assert!(matches!(
        input::parse_convex(&["1,0,0", "2,0,0", "0,0,1"], VertexFormat::Cartesian),
        Err(InputError::Htm(HtmError::DegenerateEdge(0)))
    ));
}

#[test]
fn test_read_vertex_file_uses_first_line() {
    let path = temp_path("vertices.txt");
    fs::write(&path, "1,0,0  0,1,0\t0,0,1\n9,9,9\n").unwrap();

    let tokens = input::read_vertex_file(&path).unwrap();
    assert_eq!(tokens, ["1,0,0", "0,1,0", "0,0,1"]);

    fs::write(&path, "\n1,0,0\n").unwrap();
    assert!(matches!(
        input::read_vertex_file(&path),
        Err(InputError::NoVertices(_))
    ));
    fs::remove_file(&path).ok();

    assert!(matches!(
        input::read_vertex_file(&temp_path("missing.txt")),
        Err(InputError::Io { .. })
    ));
}

#[test]
fn test_parse_ranges_accepts_names_ids_and_separators() {
    let from_names = input::parse_ranges("N30,N31\nS12,S12\n").unwrap();
    assert_eq!(from_names, sample_set());

    let (n30, n31, s12) = (id("N30").id(), id("N31").id(), id("S12").id());
    let compact = format!("{},{};{},{}\n", n30, n31, s12, s12);
    assert_eq!(input::parse_ranges(&compact).unwrap(), sample_set());

    let spaced = "\n  N30, N31 ;\n\nS12 , S12;;\n";
    assert_eq!(input::parse_ranges(spaced).unwrap(), sample_set());

    assert!(input::parse_ranges("").unwrap().is_empty());
}

#[test]
fn test_parse_ranges_errors() {
    assert!(matches!(
        input::parse_ranges("N30,N31\nN32"),
        Err(InputError::Range { line: 2, .. })
    ));
    assert!(matches!(
        input::parse_ranges("N30,N31,N32"),
        Err(InputError::Range { line: 1, .. })
    ));
    assert!(matches!(
        input::parse_ranges("N30,X1"),
        Err(InputError::Htm(HtmError::InvalidName(_)))
    ));
    assert!(matches!(
        input::parse_ranges("N10,N11\nN13,N10\n"),
        Err(InputError::Range { line: 2, .. })
    ));
    // A shallower high bound covers all of its descendants.
    assert!(input::parse_ranges("N13,N1").is_ok());
}

#[test]
fn test_text_output() {
    let set = sample_set();

    let lines = output::format_text(&set, TextOptions::default());
    assert_eq!(lines, "S12,S12\nN30,N31\n");

    let numeric = output::format_text(
        &set,
        TextOptions {
            style: IdStyle::Numeric,
            compact: true,
        },
    );
    let expected = format!(
        "{},{};{},{}\n",
        id("S12").id(),
        id("S12").id(),
        id("N30").id(),
        id("N31").id()
    );
    assert_eq!(numeric, expected);
}

#[test]
fn test_saved_ranges_read_back() {
    let set = sample_set();
    let cases = [
        ("plain.txt", OutputFormat::Text(TextOptions::default())),
        (
            "compact.txt.gz",
            OutputFormat::Text(TextOptions {
                style: IdStyle::Numeric,
                compact: true,
            }),
        ),
        ("ranges.json", OutputFormat::Json),
        ("ranges.json.gz", OutputFormat::Json),
    ];

    for (name, format) in cases {
        let path = temp_path(name);
        output::save(&path, &set, format).unwrap();
        let loaded = input::read_ranges(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(loaded, set, "{} did not read back", name);
    }
}

#[test]
fn test_cover_output_end_to_end() {
    let convex = input::parse_convex(&["0,0", "0,90", "90,0"], VertexFormat::LatLon).unwrap();
    let mut cover = Cover::new(&convex, 2);
    cover.run();
    let ranges = cover.id_ranges(2);

    let text = output::format_text(&ranges, TextOptions::default());
    let reparsed = input::parse_ranges(&text).unwrap();
    assert_eq!(reparsed, ranges);
    assert!(reparsed.contains(id("N3")));
}
