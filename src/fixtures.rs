// Small copies of the upstream sources, trimmed to a few rows.

pub const CONFIRMED_CSV: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20
,Afghanistan,33.93911,67.709953,0,1
";

pub const DEATHS_CSV: &str = "\
Province/State,Country/Region,Lat,Long,1/22/20,1/23/20
,Afghanistan,33.93911,67.709953,0,0
";

pub const WORLD_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<table id="example2" class="table table-striped">
<thead>
<tr>
<th>#</th><th>Country (or dependency)</th><th>Population (2020)</th><th>Yearly Change</th>
<th>Net Change</th><th>Density (P/Km²)</th><th>Land Area (Km²)</th><th>Migrants (net)</th>
<th>Fert. Rate</th><th>Med. Age</th><th>Urban Pop %</th><th>World Share</th>
</tr>
</thead>
<tbody>
<tr>
<td>1</td><td><a href="/afghanistan">Afghanistan</a></td><td>38,928,346</td><td>2.33 %</td>
<td>886,592</td><td>60</td><td>652,860</td><td>-62,920</td>
<td>4.6</td><td>18</td><td>25 %</td><td>0.50 %</td>
</tr>
<tr>
<td>2</td><td>Holy See</td><td>801</td><td>0.25 %</td>
<td>2</td><td>2,003</td><td>0</td><td>N.A.</td>
<td>N.A.</td><td>N.A.</td><td>N.A.</td><td>0.00 %</td>
</tr>
<tr>
<td>3</td><td>Channel Islands</td><td>173,863</td><td>0.93 %</td>
<td>1,604</td><td>915</td><td>190</td><td>1,351</td>
<td>1.5</td><td>43</td><td>30 %</td><td>0.00 %</td>
</tr>
</tbody>
</table>
</body>
</html>
"#;

/// Every distinct `Country/Region` of the global time series.
pub const TIME_SERIES_COUNTRIES: &[&str] = &[
    "Afghanistan", "Albania", "Algeria", "Andorra", "Angola", "Antarctica",
    "Antigua and Barbuda", "Argentina", "Armenia", "Australia", "Austria",
    "Azerbaijan", "Bahamas", "Bahrain", "Bangladesh", "Barbados", "Belarus",
    "Belgium", "Belize", "Benin", "Bhutan", "Bolivia", "Bosnia and Herzegovina",
    "Botswana", "Brazil", "Brunei", "Bulgaria", "Burkina Faso", "Burma", "Burundi",
    "Cabo Verde", "Cambodia", "Cameroon", "Canada", "Central African Republic",
    "Chad", "Chile", "China", "Colombia", "Comoros", "Congo (Brazzaville)",
    "Congo (Kinshasa)", "Costa Rica", "Cote d'Ivoire", "Croatia", "Cuba", "Cyprus",
    "Czechia", "Denmark", "Diamond Princess", "Djibouti", "Dominica",
    "Dominican Republic", "Ecuador", "Egypt", "El Salvador", "Equatorial Guinea",
    "Eritrea", "Estonia", "Eswatini", "Ethiopia", "Fiji", "Finland", "France",
    "Gabon", "Gambia", "Georgia", "Germany", "Ghana", "Greece", "Grenada",
    "Guatemala", "Guinea", "Guinea-Bissau", "Guyana", "Haiti", "Holy See",
    "Honduras", "Hungary", "Iceland", "India", "Indonesia", "Iran", "Iraq",
    "Ireland", "Israel", "Italy", "Jamaica", "Japan", "Jordan", "Kazakhstan",
    "Kenya", "Kiribati", "Korea, North", "Korea, South", "Kosovo", "Kuwait",
    "Kyrgyzstan", "Laos", "Latvia", "Lebanon", "Lesotho", "Liberia", "Libya",
    "Liechtenstein", "Lithuania", "Luxembourg", "MS Zaandam", "Madagascar",
    "Malawi", "Malaysia", "Maldives", "Mali", "Malta", "Marshall Islands",
    "Mauritania", "Mauritius", "Mexico", "Micronesia", "Moldova", "Monaco",
    "Mongolia", "Montenegro", "Morocco", "Mozambique", "Namibia", "Nauru", "Nepal",
    "Netherlands", "New Zealand", "Nicaragua", "Niger", "Nigeria",
    "North Macedonia", "Norway", "Oman", "Pakistan", "Palau", "Panama",
    "Papua New Guinea", "Paraguay", "Peru", "Philippines", "Poland", "Portugal",
    "Qatar", "Romania", "Russia", "Rwanda", "Saint Kitts and Nevis", "Saint Lucia",
    "Saint Vincent and the Grenadines", "Samoa", "San Marino",
    "Sao Tome and Principe", "Saudi Arabia", "Senegal", "Serbia", "Seychelles",
    "Sierra Leone", "Singapore", "Slovakia", "Slovenia", "Solomon Islands",
    "Somalia", "South Africa", "South Sudan", "Spain", "Sri Lanka", "Sudan",
    "Summer Olympics 2020", "Suriname", "Sweden", "Switzerland", "Syria", "Taiwan*",
    "Tajikistan", "Tanzania", "Thailand", "Timor-Leste", "Togo", "Tonga",
    "Trinidad and Tobago", "Tunisia", "Turkey", "Tuvalu", "US", "Uganda", "Ukraine",
    "United Arab Emirates", "United Kingdom", "Uruguay", "Uzbekistan", "Vanuatu",
    "Venezuela", "Vietnam", "West Bank and Gaza", "Winter Olympics 2022", "Yemen",
    "Zambia", "Zimbabwe",
];

/// Every name of the population table.
pub const POPULATION_TABLE_COUNTRIES: &[&str] = &[
    "China", "India", "United States", "Indonesia", "Pakistan", "Brazil", "Nigeria",
    "Bangladesh", "Russia", "Mexico", "Japan", "Ethiopia", "Philippines", "Egypt",
    "Vietnam", "DR Congo", "Turkey", "Iran", "Germany", "Thailand",
    "United Kingdom", "France", "Italy", "Tanzania", "South Africa", "Myanmar",
    "Kenya", "South Korea", "Colombia", "Spain", "Uganda", "Argentina", "Algeria",
    "Sudan", "Ukraine", "Iraq", "Afghanistan", "Poland", "Canada", "Morocco",
    "Saudi Arabia", "Uzbekistan", "Peru", "Angola", "Malaysia", "Mozambique",
    "Ghana", "Yemen", "Nepal", "Venezuela", "Madagascar", "Cameroon",
    "Côte d'Ivoire", "North Korea", "Australia", "Niger", "Taiwan", "Sri Lanka",
    "Burkina Faso", "Mali", "Romania", "Malawi", "Chile", "Kazakhstan", "Zambia",
    "Guatemala", "Ecuador", "Syria", "Netherlands", "Senegal", "Cambodia", "Chad",
    "Somalia", "Zimbabwe", "Guinea", "Rwanda", "Benin", "Burundi", "Tunisia",
    "Bolivia", "Belgium", "Haiti", "Cuba", "South Sudan", "Dominican Republic",
    "Czech Republic (Czechia)", "Greece", "Jordan", "Portugal", "Azerbaijan",
    "Sweden", "Honduras", "United Arab Emirates", "Hungary", "Tajikistan",
    "Belarus", "Austria", "Papua New Guinea", "Serbia", "Israel", "Switzerland",
    "Togo", "Sierra Leone", "Hong Kong", "Laos", "Paraguay", "Bulgaria", "Libya",
    "Lebanon", "Nicaragua", "Kyrgyzstan", "El Salvador", "Turkmenistan",
    "Singapore", "Denmark", "Finland", "Congo", "Slovakia", "Norway", "Oman",
    "State of Palestine", "Costa Rica", "Liberia", "Ireland",
    "Central African Republic", "New Zealand", "Mauritania", "Panama", "Kuwait",
    "Croatia", "Moldova", "Georgia", "Eritrea", "Uruguay", "Bosnia and Herzegovina",
    "Mongolia", "Armenia", "Jamaica", "Qatar", "Albania", "Puerto Rico",
    "Lithuania", "Namibia", "Gambia", "Botswana", "Gabon", "Lesotho",
    "North Macedonia", "Slovenia", "Guinea-Bissau", "Latvia", "Bahrain",
    "Equatorial Guinea", "Trinidad and Tobago", "Estonia", "Timor-Leste",
    "Mauritius", "Cyprus", "Eswatini", "Djibouti", "Fiji", "Réunion", "Comoros",
    "Guyana", "Bhutan", "Solomon Islands", "Macao", "Montenegro", "Luxembourg",
    "Western Sahara", "Suriname", "Cabo Verde", "Maldives", "Malta", "Brunei",
    "Guadeloupe", "Belize", "Bahamas", "Martinique", "Iceland", "Vanuatu",
    "French Guiana", "Barbados", "New Caledonia", "French Polynesia", "Mayotte",
    "Sao Tome & Principe", "Samoa", "Saint Lucia", "Channel Islands", "Guam",
    "Curaçao", "Kiribati", "Micronesia", "Grenada", "St. Vincent & Grenadines",
    "Aruba", "Tonga", "U.S. Virgin Islands", "Seychelles", "Antigua and Barbuda",
    "Isle of Man", "Andorra", "Dominica", "Cayman Islands", "Bermuda",
    "Marshall Islands", "Northern Mariana Islands", "Greenland", "American Samoa",
    "Saint Kitts & Nevis", "Faeroe Islands", "Sint Maarten", "Monaco",
    "Turks and Caicos", "Saint Martin", "Liechtenstein", "San Marino", "Gibraltar",
    "British Virgin Islands", "Caribbean Netherlands", "Palau", "Cook Islands",
    "Anguilla", "Tuvalu", "Wallis & Futuna", "Nauru", "Saint Barthelemy",
    "Saint Pierre & Miquelon", "Montserrat", "Falkland Islands", "Niue", "Tokelau",
    "Holy See",
];
