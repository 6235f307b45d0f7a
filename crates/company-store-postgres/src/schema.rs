//! SQL schema for the PostgreSQL store.
//!
//! Sent as one simple-protocol batch, which PostgreSQL runs as a single
//! implicit transaction; the advisory lock serialises concurrent initialisers.

/// Full schema DDL; idempotent.
pub const SCHEMA: &str = r#"
SELECT pg_advisory_xact_lock(7265327);

CREATE TABLE IF NOT EXISTS person (
    person_id     SERIAL PRIMARY KEY,
    name          VARCHAR(100) NOT NULL,
    address       VARCHAR(255),
    phone         VARCHAR(20),
    email         VARCHAR(100) NOT NULL,
    person_type   VARCHAR(20)  NOT NULL,
    created_at    TIMESTAMPTZ  NOT NULL DEFAULT CURRENT_TIMESTAMP,
    last_modified TIMESTAMPTZ  NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CONSTRAINT uq_person_email  UNIQUE (email),
    CONSTRAINT chk_person_email CHECK (email ~* '^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$'),
    CONSTRAINT chk_person_type  CHECK (person_type IN ('Customer', 'Employee', 'Both'))
);

CREATE TABLE IF NOT EXISTS customer (
    customer_id       SERIAL PRIMARY KEY,
    person_id         INTEGER     NOT NULL,
    loyalty_points    INTEGER     NOT NULL DEFAULT 0,
    registration_date DATE        NOT NULL DEFAULT CURRENT_DATE,
    customer_tier     VARCHAR(20) NOT NULL DEFAULT 'Bronze',
    CONSTRAINT uq_customer_person   UNIQUE (person_id),
    CONSTRAINT fk_customer_person   FOREIGN KEY (person_id)
        REFERENCES person(person_id) ON DELETE CASCADE ON UPDATE CASCADE,
    CONSTRAINT chk_customer_loyalty CHECK (loyalty_points >= 0),
    CONSTRAINT chk_customer_tier    CHECK (customer_tier IN ('Bronze', 'Silver', 'Gold', 'Platinum'))
);

CREATE TABLE IF NOT EXISTS employee (
    employee_id SERIAL PRIMARY KEY,
    person_id   INTEGER       NOT NULL,
    salary      NUMERIC(12,2) NOT NULL,
    department  VARCHAR(50)   NOT NULL,
    hire_date   DATE          NOT NULL DEFAULT CURRENT_DATE,
    position    VARCHAR(100),
    manager_id  INTEGER,
    CONSTRAINT uq_employee_person     UNIQUE (person_id),
    CONSTRAINT fk_employee_person     FOREIGN KEY (person_id)
        REFERENCES person(person_id) ON DELETE CASCADE ON UPDATE CASCADE,
    CONSTRAINT fk_employee_manager    FOREIGN KEY (manager_id)
        REFERENCES employee(employee_id) ON DELETE SET NULL,
    CONSTRAINT chk_employee_salary    CHECK (salary > 0),
    CONSTRAINT chk_employee_hire_date CHECK (hire_date <= CURRENT_DATE)
);

CREATE INDEX IF NOT EXISTS idx_person_type         ON person(person_type);
CREATE INDEX IF NOT EXISTS idx_customer_tier       ON customer(customer_tier);
CREATE INDEX IF NOT EXISTS idx_customer_loyalty    ON customer(loyalty_points);
CREATE INDEX IF NOT EXISTS idx_employee_department ON employee(department);
CREATE INDEX IF NOT EXISTS idx_employee_manager    ON employee(manager_id);

CREATE OR REPLACE FUNCTION touch_last_modified() RETURNS TRIGGER AS $$
BEGIN
    NEW.last_modified = CURRENT_TIMESTAMP;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

DROP TRIGGER IF EXISTS trg_person_last_modified ON person;
CREATE TRIGGER trg_person_last_modified
    BEFORE UPDATE ON person
    FOR EACH ROW
    EXECUTE FUNCTION touch_last_modified();

CREATE OR REPLACE VIEW v_customer_complete AS
SELECT
    p.person_id, p.name, p.address, p.phone, p.email,
    c.customer_id, c.loyalty_points, c.customer_tier, c.registration_date
FROM person p
INNER JOIN customer c ON c.person_id = p.person_id;

CREATE OR REPLACE VIEW v_employee_complete AS
SELECT
    p.person_id, p.name, p.address, p.phone, p.email,
    e.employee_id, e.salary, e.department, e.hire_date, e.position,
    e.manager_id, mp.name AS manager_name
FROM person p
INNER JOIN employee e ON e.person_id = p.person_id
LEFT JOIN employee m  ON m.employee_id = e.manager_id
LEFT JOIN person mp   ON mp.person_id = m.person_id;
"#;
