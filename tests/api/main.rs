mod members;

// all api tests are bundled into a single binary (tests/api/), rather than one
// binary per tests/*.rs file: linking is sequential, so fewer binaries means a
// faster test suite. `helpers` is a plain module, not a test target.
//
// each test gets its own `MockServer`, so tests never see each other's
// requests
