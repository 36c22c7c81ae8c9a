use anyhow::Result;
use tempfile::TempDir;

use stepflow::deck::{self, ErrorAction, ParseContext};

fn write_case(dir: &TempDir, name: &str, schedule_tail: &str) -> Result<String> {
    let content = format!(
        "\
RUNSPEC
DIMENS
 2 2 1 /
OIL
GAS
WATER
FIELD
START
 1 'JAN' 2015 /
GRID
DX
 4*1000 /
DY
 4*1000 /
DZ
 4*50 /
TOPS
 4*8000 /
PORO
 4*0.3 /
PERMX
 4*200 /
PROPS
ROCK
 14.7 3E-6 /
SOLUTION
EQUIL
 8020 4500 /
SUMMARY
FOPR
WBHP
 'PROD' /
SCHEDULE
WELSPECS
 'PROD' 'G1' 2 2 8020 'OIL' /
/
COMPDAT
 'PROD' 2* 1 1 'OPEN' /
/
WCONPROD
 'PROD' 'OPEN' 'ORAT' 2000 4* 500 /
/
{}TSTEP
 31 28 /
END
",
        schedule_tail
    );
    let path = dir.path().join(name);
    std::fs::write(&path, content)?;
    Ok(path.display().to_string())
}

/// A stray slash is skipped under the default recovery action.
#[test]
fn test_stray_slash_ignored_by_default() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_case(&dir, "STRAY.DATA", "/\n")?;

    let case = deck::parse_file(path.as_ref(), &ParseContext::default())?;
    assert_eq!(case.schedule().report_steps.len(), 2);
    Ok(())
}

/// The same input is rejected when the action is tightened to error.
#[test]
fn test_stray_slash_fatal_when_strict() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_case(&dir, "STRAY.DATA", "/\n")?;

    let ctx = ParseContext {
        random_slash: ErrorAction::Error,
        ..ParseContext::default()
    };
    let err = deck::parse_file(path.as_ref(), &ctx).unwrap_err();
    assert!(err.to_string().contains("random slash"));
    Ok(())
}

/// A deck without an OIL phase has no valid engine configuration.
#[test]
fn test_water_gas_case_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let content = "\
RUNSPEC
DIMENS
 1 1 1 /
GAS
WATER
GRID
DX
 1000 /
DY
 1000 /
DZ
 50 /
TOPS
 8000 /
PORO
 0.3 /
PERMX
 200 /
SOLUTION
EQUIL
 8020 4500 /
SCHEDULE
TSTEP
 31 /
END
";
    let path = dir.path().join("WATGAS.DATA");
    std::fs::write(&path, content)?;

    let err = deck::parse_file(&path, &ParseContext::default()).unwrap_err();
    assert!(err.to_string().contains("no OIL"));
    Ok(())
}
