/*!

This is the long-form manual for `participation_stats` and the `partmap` server.

## Input format

The input is an Excel workbook (`.xlsx`) with one worksheet per competition. The
worksheet must be named exactly like the competition (`IROS 2024`, `CDC 2024`,
`ICRA 2025`, `CDC-TF 2025` by default). There is no header row and the columns
are read by position:

| column | content |
|---|---|
| A | sequence number of the team |
| B | team name |
| C | team member |
| D | organization |
| E | country |

Teams with several members usually fill columns A, B, D and E on the first
member only. These columns are forward-filled: an empty cell takes the value of
the closest non-empty cell above it in the same worksheet. Rows with an empty
team member are ignored, which makes it possible to separate teams with blank
lines.

A worksheet that does not use exactly the five columns A to E is refused.

## Countries

A country cell may name several countries, separated by `,`, `&`, `/` or the
word `and`. Each country then gets its own copy of the registration:

```text
1 | Racers | Anna | ETH | Switzerland & Germany
```

counts Anna once for Switzerland and once for Germany.

Some spellings are replaced by the name that the map understands:

| spelling | country |
|---|---|
| `USA`, `U.S.`, `United States of America (USA)`, `United States (US)` | United States |
| `UAE`, `United Arab Emirates (UAE)` | United Arab Emirates |
| `Côte d'Ivoire` | Ivory Coast |
| `Republic of Korea` | South Korea |
| `Republic of Türkiye`, `Turkiye`, `Türkiye` | Turkey |
| `UK`, `U.K.` | United Kingdom |

The replacement is case-sensitive: `usa` is kept as it is, and will not appear on
the map. Names that the map does not know are not reported as errors; the
country simply stays blank. The list of countries found is printed in the logs
at startup.

## Metrics

| metric | meaning |
|---|---|
| `Teams` | number of distinct team names |
| `Participants` | number of team members |
| `Organizations` | number of distinct organizations |
| `Participation` | number of competitions the country took part in (only for `All Competitions`) |

The `All Competitions` statistics are computed over all the registrations at once.
A team that registered to two competitions with the same name counts once.

## Configuration

The `--config` option accepts a JSON file:

```json
{
  "competitions": ["IROS 2024", "CDC 2024"],
  "heading": "My league",
  "link": "https://example.org"
}
```

All fields are optional. The country replacements cannot be configured.

*/
