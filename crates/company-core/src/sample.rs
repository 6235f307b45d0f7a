//! The sample data set shipped with the schema.
//!
//! Written in the SQL subset PostgreSQL and SQLite share, so every backend
//! loads the same rows. Re-running it is a no-op: persons are keyed by email
//! and subtype rows by person.
//!
//! Ten persons; customers are persons 1, 2, 3, 5, 8, 9 and employees are
//! persons 3, 4, 6, 7, 8, 10, so persons 3 and 8 hold both roles.

/// Email addresses of the sample persons that are both customer and employee.
pub const DUAL_ROLE_EMAILS: [&str; 2] =
  ["michael.johnson@email.com", "lisa.anderson@email.com"];

pub const SAMPLE_DATA: &str = "
INSERT INTO person (name, address, phone, email, person_type) VALUES
    ('John Smith',      '123 Main St, Springfield, IL', '555-0101', 'john.smith@email.com',      'Customer'),
    ('Jane Doe',        '456 Oak Ave, Portland, OR',    '555-0102', 'jane.doe@email.com',        'Customer'),
    ('Michael Johnson', '789 Pine Rd, Austin, TX',      '555-0103', 'michael.johnson@email.com', 'Both'),
    ('Emily Davis',     '321 Elm St, Denver, CO',       '555-0104', 'emily.davis@email.com',     'Employee'),
    ('Robert Brown',    '654 Maple Dr, Boston, MA',     '555-0105', 'robert.brown@email.com',    'Customer'),
    ('Sarah Wilson',    '987 Cedar Ln, Seattle, WA',    '555-0106', 'sarah.wilson@email.com',    'Employee'),
    ('David Martinez',  '147 Birch Blvd, Miami, FL',    '555-0107', 'david.martinez@email.com',  'Employee'),
    ('Lisa Anderson',   '258 Spruce Way, Chicago, IL',  '555-0108', 'lisa.anderson@email.com',   'Both'),
    ('James Taylor',    '369 Walnut St, Phoenix, AZ',   '555-0109', 'james.taylor@email.com',    'Customer'),
    ('Maria Garcia',    '741 Ash Ct, San Diego, CA',    '555-0110', 'maria.garcia@email.com',    'Employee')
ON CONFLICT (email) DO NOTHING;

INSERT INTO customer (person_id, loyalty_points, registration_date, customer_tier) VALUES
    ((SELECT person_id FROM person WHERE email = 'john.smith@email.com'),      1500, '2021-02-14', 'Gold'),
    ((SELECT person_id FROM person WHERE email = 'jane.doe@email.com'),        250,  '2022-07-01', 'Bronze'),
    ((SELECT person_id FROM person WHERE email = 'michael.johnson@email.com'), 3200, '2019-11-20', 'Platinum'),
    ((SELECT person_id FROM person WHERE email = 'robert.brown@email.com'),    800,  '2023-01-09', 'Silver'),
    ((SELECT person_id FROM person WHERE email = 'lisa.anderson@email.com'),   1200, '2020-05-30', 'Gold'),
    ((SELECT person_id FROM person WHERE email = 'james.taylor@email.com'),    50,   '2024-03-03', 'Bronze')
ON CONFLICT (person_id) DO NOTHING;

INSERT INTO employee (person_id, salary, department, hire_date, position) VALUES
    ((SELECT person_id FROM person WHERE email = 'emily.davis@email.com'),     125000.00, 'Engineering', '2015-03-01', 'Engineering Manager'),
    ((SELECT person_id FROM person WHERE email = 'sarah.wilson@email.com'),    110000.00, 'Sales',       '2016-08-15', 'Sales Manager'),
    ((SELECT person_id FROM person WHERE email = 'michael.johnson@email.com'), 95000.00,  'Engineering', '2018-06-15', 'Software Engineer'),
    ((SELECT person_id FROM person WHERE email = 'david.martinez@email.com'),  62000.00,  'Sales',       '2020-01-06', 'Sales Representative'),
    ((SELECT person_id FROM person WHERE email = 'lisa.anderson@email.com'),   78000.00,  'Marketing',   '2019-04-22', 'Marketing Specialist'),
    ((SELECT person_id FROM person WHERE email = 'maria.garcia@email.com'),    88000.00,  'Engineering', '2021-09-13', 'QA Engineer')
ON CONFLICT (person_id) DO NOTHING;

UPDATE employee
SET manager_id = (
    SELECT m.employee_id FROM employee m
    JOIN person mp ON mp.person_id = m.person_id
    WHERE mp.email = 'emily.davis@email.com'
)
WHERE manager_id IS NULL
  AND person_id IN (
      SELECT person_id FROM person
      WHERE email IN ('michael.johnson@email.com', 'maria.garcia@email.com')
  );

UPDATE employee
SET manager_id = (
    SELECT m.employee_id FROM employee m
    JOIN person mp ON mp.person_id = m.person_id
    WHERE mp.email = 'sarah.wilson@email.com'
)
WHERE manager_id IS NULL
  AND person_id IN (
      SELECT person_id FROM person WHERE email = 'david.martinez@email.com'
  );
";
