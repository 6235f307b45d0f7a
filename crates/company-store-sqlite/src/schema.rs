//! SQL schema for the SQLite store.
//!
//! Executed on every open. Timestamps are RFC 3339 text, dates are
//! `YYYY-MM-DD` text, salaries are REAL.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS person (
    person_id     INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT NOT NULL,
    address       TEXT,
    phone         TEXT,
    email         TEXT NOT NULL UNIQUE
                  -- local@domain.tld; rtrim(email, <every non-dot char>) ends at the last dot
                  CONSTRAINT chk_person_email CHECK (
                      email GLOB '?*@?*'
                      AND email NOT GLOB '*@*@*'
                      AND email NOT GLOB '*[^A-Za-z0-9._%+@-]*'
                      AND length(rtrim(email, replace(email, '.', ''))) > instr(email, '@') + 1
                      AND length(email) - length(rtrim(email, replace(email, '.', ''))) >= 2
                      AND substr(email, length(rtrim(email, replace(email, '.', ''))) + 1)
                          NOT GLOB '*[^A-Za-z]*'
                  ),
    person_type   TEXT NOT NULL
                  CONSTRAINT chk_person_type CHECK (person_type IN ('Customer', 'Employee', 'Both')),
    created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    last_modified TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS customer (
    customer_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id         INTEGER NOT NULL UNIQUE
                      REFERENCES person(person_id) ON DELETE CASCADE ON UPDATE CASCADE,
    loyalty_points    INTEGER NOT NULL DEFAULT 0
                      CONSTRAINT chk_customer_loyalty CHECK (loyalty_points BETWEEN 0 AND 2147483647),
    registration_date TEXT NOT NULL DEFAULT (date('now')),
    customer_tier     TEXT NOT NULL DEFAULT 'Bronze'
                      CONSTRAINT chk_customer_tier CHECK (customer_tier IN ('Bronze', 'Silver', 'Gold', 'Platinum'))
);

CREATE TABLE IF NOT EXISTS employee (
    employee_id INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id   INTEGER NOT NULL UNIQUE
                REFERENCES person(person_id) ON DELETE CASCADE ON UPDATE CASCADE,
    salary      REAL NOT NULL
                CONSTRAINT chk_employee_salary CHECK (salary > 0),
    department  TEXT NOT NULL,
    hire_date   TEXT NOT NULL DEFAULT (date('now')),
    position    TEXT,
    manager_id  INTEGER REFERENCES employee(employee_id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_person_type         ON person(person_type);
CREATE INDEX IF NOT EXISTS idx_customer_tier       ON customer(customer_tier);
CREATE INDEX IF NOT EXISTS idx_customer_loyalty    ON customer(loyalty_points);
CREATE INDEX IF NOT EXISTS idx_employee_department ON employee(department);
CREATE INDEX IF NOT EXISTS idx_employee_manager    ON employee(manager_id);

-- CHECK constraints may not call date('now') in SQLite.
CREATE TRIGGER IF NOT EXISTS trg_employee_hire_date_insert
BEFORE INSERT ON employee
WHEN NEW.hire_date > date('now')
BEGIN
    SELECT RAISE(ABORT, 'chk_employee_hire_date: hire date cannot be in the future');
END;

CREATE TRIGGER IF NOT EXISTS trg_employee_hire_date_update
BEFORE UPDATE OF hire_date ON employee
WHEN NEW.hire_date > date('now')
BEGIN
    SELECT RAISE(ABORT, 'chk_employee_hire_date: hire date cannot be in the future');
END;

-- Recursive triggers are off, so the inner UPDATE does not re-fire this.
CREATE TRIGGER IF NOT EXISTS trg_person_last_modified
AFTER UPDATE ON person
BEGIN
    UPDATE person
    SET last_modified = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE person_id = NEW.person_id;
END;

CREATE VIEW IF NOT EXISTS v_customer_complete AS
SELECT
    p.person_id, p.name, p.address, p.phone, p.email,
    c.customer_id, c.loyalty_points, c.customer_tier, c.registration_date
FROM person p
INNER JOIN customer c ON c.person_id = p.person_id;

CREATE VIEW IF NOT EXISTS v_employee_complete AS
SELECT
    p.person_id, p.name, p.address, p.phone, p.email,
    e.employee_id, e.salary, e.department, e.hire_date, e.position,
    e.manager_id, mp.name AS manager_name
FROM person p
INNER JOIN employee e ON e.person_id = p.person_id
LEFT JOIN employee m  ON m.employee_id = e.manager_id
LEFT JOIN person mp   ON mp.person_id = m.person_id;
";
