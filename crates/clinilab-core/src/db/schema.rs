//! SQLite schema definition.

/// Complete database schema for the administrative core.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Cash Registers (one row per attendant session)
-- ============================================================================

CREATE TABLE IF NOT EXISTS cash_registers (
    id TEXT PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    attendant TEXT NOT NULL,
    opening_balance REAL NOT NULL DEFAULT 0,
    cash_total REAL NOT NULL DEFAULT 0 CHECK (cash_total >= 0),
    card_total REAL NOT NULL DEFAULT 0 CHECK (card_total >= 0),
    check_total REAL NOT NULL DEFAULT 0 CHECK (check_total >= 0),
    status TEXT NOT NULL DEFAULT 'open' CHECK (status IN ('open', 'closed')),
    opened_at TEXT NOT NULL,
    closed_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_registers_attendant ON cash_registers(attendant);
CREATE INDEX IF NOT EXISTS idx_registers_status ON cash_registers(status);

-- ============================================================================
-- Unit Ledger (manual entries, append-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS ledger_entries (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL CHECK (kind IN ('entrada', 'saida')),
    amount REAL NOT NULL CHECK (amount > 0),
    reason TEXT NOT NULL,
    notes TEXT,
    created_at TEXT NOT NULL
);

-- ============================================================================
-- Sample Batches (lotes)
-- ============================================================================

CREATE TABLE IF NOT EXISTS sample_batches (
    id TEXT PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

-- ============================================================================
-- Lab Samples
-- ============================================================================

CREATE TABLE IF NOT EXISTS lab_samples (
    id TEXT PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    patient TEXT NOT NULL,
    material TEXT NOT NULL,
    bench TEXT NOT NULL,
    collected_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'available'
        CHECK (status IN ('available', 'batched', 'cancelled')),
    batch_id TEXT REFERENCES sample_batches(id),
    cancel_reason TEXT,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_samples_status ON lab_samples(status);
CREATE INDEX IF NOT EXISTS idx_samples_batch ON lab_samples(batch_id);

-- Batched rows carry a batch, cancelled rows carry a reason
CREATE TRIGGER IF NOT EXISTS lab_samples_check_status BEFORE UPDATE ON lab_samples
BEGIN
    SELECT CASE
        WHEN new.status = 'batched' AND new.batch_id IS NULL THEN
            RAISE(ABORT, 'Batched samples must reference a batch')
        WHEN new.status = 'cancelled' AND (new.cancel_reason IS NULL OR new.cancel_reason = '') THEN
            RAISE(ABORT, 'Cancelled samples must carry a reason')
        WHEN old.status = 'cancelled' AND new.status != 'cancelled' THEN
            RAISE(ABORT, 'Cancelled samples are terminal')
    END;
END;

-- ============================================================================
-- Insurer Activity (report source rows)
-- ============================================================================

CREATE TABLE IF NOT EXISTS insurer_activity (
    name TEXT PRIMARY KEY,
    requests INTEGER NOT NULL DEFAULT 0,
    exams INTEGER NOT NULL DEFAULT 0,
    total_value REAL NOT NULL DEFAULT 0
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    document TEXT,
    birth_date TEXT,
    insurer TEXT,
    phone TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);

-- ============================================================================
-- Audit Events (hash-chained, append-only)
-- ============================================================================

CREATE TABLE IF NOT EXISTS audit_events (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    unit TEXT NOT NULL,
    action TEXT NOT NULL,
    detail TEXT NOT NULL,                        -- JSON payload
    created_at TEXT NOT NULL,
    prev_hash TEXT NOT NULL,
    hash TEXT NOT NULL UNIQUE
);
"#;
