#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

/// Temporary SQLite file seeded with the ERP project tables. The file lives
/// as long as this value.
pub struct TestDatabase {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("temp dir should be created");
        let path = temp_dir.path().join("erp.db");

        let conn = Connection::open(&path).expect("database should open");
        conn.execute_batch(SCHEMA).expect("schema should apply");

        Self { path, _temp_dir: temp_dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn execute_batch(&self, sql: &str) {
        let conn = Connection::open(&self.path).expect("database should open");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }
}

const SCHEMA: &str = "
CREATE TABLE AF8010 (
    AF8_FILIAL TEXT, AF8_PROJET TEXT, AF8_REVISA TEXT, AF8_XNOMCL TEXT,
    AF8_XCC TEXT, D_E_L_E_T_ TEXT
);
CREATE TABLE AFC010 (
    AFC_FILIAL TEXT, AFC_PROJET TEXT, AFC_REVISA TEXT, AFC_EDT TEXT,
    AFC_XPROD TEXT, AFC_XPRODU TEXT, D_E_L_E_T_ TEXT
);
CREATE TABLE AF9010 (
    AF9_FILIAL TEXT, AF9_PROJET TEXT, AF9_REVISA TEXT, AF9_TAREFA TEXT,
    AF9_EDTPAI TEXT, D_E_L_E_T_ TEXT
);
CREATE TABLE AFA010 (
    AFA_FILIAL TEXT, AFA_PROJET TEXT, AFA_REVISA TEXT, AFA_TAREFA TEXT,
    AFA_ITEM TEXT, AFA_PRODUT TEXT, AFA_XDESCR TEXT, AFA_QUANT REAL,
    AFA_XESTRU TEXT, D_E_L_E_T_ TEXT
);
CREATE TABLE SCP010 (
    CP_FILIAL TEXT, CP_NUM TEXT, CP_ITEM TEXT, CP_XPROJET TEXT, CP_XPROD TEXT,
    CP_XTAREFA TEXT, CP_XITTARE TEXT, CP_PRODUTO TEXT, CP_QUANT REAL,
    CP_XQUPR REAL, CP_PREREQU TEXT, D_E_L_E_T_ TEXT
);
";

/// Two live projects; PRJ001 has cells CEL-A (two products) and CEL-B.
/// Deleted rows, cost-center projects, non-structural resources and
/// non-pre-requisition SCP rows must all be ignored.
pub fn seed_projects(db: &TestDatabase) {
    db.execute_batch(
        "
        INSERT INTO AF8010 VALUES ('01', 'PRJ001', '0001', 'Acme Foods  ', ' ', ' ');
        INSERT INTO AF8010 VALUES ('01', 'PRJ002', '0002', 'Beta Mills', ' ', ' ');
        INSERT INTO AF8010 VALUES ('01', 'PRJ003', '0001', 'Deleted', ' ', '*');
        INSERT INTO AF8010 VALUES ('01', 'PRJ004', '0001', 'Cost center', 'CC1', ' ');

        INSERT INTO AFC010 VALUES ('01', 'PRJ001', '0001', 'E1', 'CEL-A', ' ', ' ');
        INSERT INTO AFC010 VALUES ('01', 'PRJ001', '0001', 'E2', 'CEL-B', ' ', ' ');
        INSERT INTO AFC010 VALUES ('01', 'PRJ002', '0002', 'E1', 'CEL-Z', ' ', ' ');
        INSERT INTO AFC010 VALUES ('01', 'PRJ003', '0001', 'E1', 'CEL-X', ' ', ' ');
        INSERT INTO AFC010 VALUES ('01', 'PRJ004', '0001', 'E1', 'CEL-Y', ' ', ' ');

        INSERT INTO AF9010 VALUES ('01', 'PRJ001', '0001', 'T1', 'E1', ' ');
        INSERT INTO AF9010 VALUES ('01', 'PRJ001', '0001', 'T2', 'E2', ' ');

        INSERT INTO AFA010 VALUES ('01', 'PRJ001', '0001', 'T1', '01', 'P100', 'Bolt', 10, 'S', ' ');
        INSERT INTO AFA010 VALUES ('01', 'PRJ001', '0001', 'T1', '02', 'P200', 'Nut', 5, 'S', ' ');
        INSERT INTO AFA010 VALUES ('01', 'PRJ001', '0001', 'T1', '03', 'P300', 'Not structural', 99, 'N', ' ');
        INSERT INTO AFA010 VALUES ('01', 'PRJ001', '0001', 'T2', '01', 'P100', 'Bolt', 7, 'S', ' ');

        INSERT INTO SCP010 VALUES ('01', '000001', '01', 'PRJ001', 'CEL-A', 'T1', '01', 'P100', 4, 3, 'S', ' ');
        INSERT INTO SCP010 VALUES ('01', '000002', '01', 'PRJ001', 'CEL-A', 'T1', '02', 'P200', 2, NULL, 'S', ' ');
        INSERT INTO SCP010 VALUES ('01', '000003', '01', 'PRJ001', 'CEL-A', 'T1', '02', 'P200', 1, 1, 'N', ' ');
        INSERT INTO SCP010 VALUES ('01', '000004', '01', 'PRJ001', 'CEL-A', 'T1', '01', 'P100', 8, 8, 'S', '*');
        ",
    );
}

/// One project stored the way Protheus pads fixed-width CHAR columns:
/// keys carry trailing spaces and blank flags are runs of spaces.
pub fn seed_padded_project(db: &TestDatabase) {
    db.execute_batch(
        "
        INSERT INTO AF8010 VALUES ('01  ', 'PRJ010    ', '0001', 'Padded Plant', '         ', '   ');

        INSERT INTO AFC010 VALUES ('01  ', 'PRJ010    ', '0001', 'E1  ', 'CEL-P     ', '    ', ' ');

        INSERT INTO AF9010 VALUES ('01', 'PRJ010', '0001', 'T1  ', 'E1', ' ');

        INSERT INTO AFA010 VALUES ('01', 'PRJ010    ', '0001', 'T1', '01', 'P900      ', 'Washer', 12, 'S', ' ');

        INSERT INTO SCP010 VALUES ('01', '000010', '01', 'PRJ010    ', 'CEL-P', 'T1', '01  ', 'P900', 6, 2, 'S', '  ');
        ",
    );
}
